//! Lossless `.properties` parser.

use super::tree::{Comment, Delimiter, PropertiesContent, PropertiesFile, PropertyEntry, PropertyValue};
use crate::error::Result;
use crate::markers::Markers;
use std::path::PathBuf;
use std::rc::Rc;

/// Parse properties `text` read from `source_path`.
///
/// Every input is accepted: a line is a comment, a `key=value` /
/// `key:value` / `key value` entry, or a bare key with an empty value.
pub fn parse(source_path: impl Into<PathBuf>, text: &str) -> Result<PropertiesFile> {
    let mut scanner = Scanner { src: text, pos: 0 };
    let mut content = Vec::new();

    loop {
        let prefix = scanner.take_while(|c| is_whitespace(c) || c == '\n' || c == '\r');
        match scanner.peek() {
            None => {
                return Ok(PropertiesFile {
                    source_path: source_path.into(),
                    markers: Markers::new(),
                    content,
                    eof: prefix,
                });
            }
            Some(delimiter @ ('#' | '!')) => {
                scanner.pos += 1;
                let message = scanner.take_while(|c| c != '\n' && c != '\r');
                content.push(PropertiesContent::Comment(Rc::new(Comment {
                    prefix,
                    delimiter,
                    message,
                })));
            }
            Some(_) => content.push(PropertiesContent::Entry(Rc::new(scanner.entry(prefix)))),
        }
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn entry(&mut self, prefix: String) -> PropertyEntry {
        let key = self.key();
        let before_delimiter = self.take_while(is_whitespace);
        let delimiter = match self.peek() {
            Some('=') => Delimiter::Equals,
            Some(':') => Delimiter::Colon,
            _ => Delimiter::None,
        };
        if delimiter != Delimiter::None {
            self.pos += 1;
        }
        let value_prefix = if delimiter == Delimiter::None {
            String::new()
        } else {
            self.take_while(is_whitespace)
        };
        let text = self.value();
        PropertyEntry {
            prefix,
            key,
            before_delimiter,
            delimiter,
            value: Rc::new(PropertyValue {
                prefix: value_prefix,
                text,
                markers: Markers::new(),
            }),
        }
    }

    /// The raw key: everything up to unescaped whitespace, `=`, `:` or the end
    /// of the line.
    fn key(&mut self) -> String {
        let start = self.pos;
        let mut chars = self.src[start..].char_indices().peekable();
        let mut end = self.src.len();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    // an escaped character, or a continuation line
                    if let Some((_, '\r')) = chars.next() {
                        if let Some(&(_, '\n')) = chars.peek() {
                            chars.next();
                        }
                    }
                }
                '=' | ':' | '\n' | '\r' => {
                    end = start + i;
                    break;
                }
                c if is_whitespace(c) => {
                    end = start + i;
                    break;
                }
                _ => {}
            }
        }
        self.pos = end;
        self.src[start..end].to_string()
    }

    /// The raw value: the rest of the line, extended over following lines
    /// while a line ends in an odd number of backslashes.
    fn value(&mut self) -> String {
        let start = self.pos;
        loop {
            let line = self.take_while(|c| c != '\n' && c != '\r');
            let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
            if trailing % 2 == 0 || self.peek().is_none() {
                break;
            }
            if self.src[self.pos..].starts_with("\r\n") {
                self.pos += 2;
            } else {
                self.pos += 1;
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        let len = self.src[start..]
            .find(|c: char| !pred(c))
            .unwrap_or(self.src.len() - start);
        self.pos += len;
        self.src[start..self.pos].to_string()
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> PropertiesFile {
        let file = parse("application.properties", text).unwrap();
        assert_eq!(file.print(), text);
        file
    }

    #[test]
    fn test_delimiters() {
        let file = roundtrip("a=1\nb : 2\nc 3\nd\n");
        let entries: Vec<_> = file.entries().collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].delimiter, Delimiter::Equals);
        assert_eq!(entries[0].value.text, "1");
        assert_eq!(entries[1].key, "b");
        assert_eq!(entries[1].before_delimiter, " ");
        assert_eq!(entries[1].delimiter, Delimiter::Colon);
        assert_eq!(entries[1].value.prefix, " ");
        assert_eq!(entries[1].value.text, "2");
        assert_eq!(entries[2].delimiter, Delimiter::None);
        assert_eq!(entries[2].value.text, "3");
        assert_eq!(entries[3].key, "d");
        assert_eq!(entries[3].value.text, "");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let file = roundtrip("# server\n\n! legacy\nserver.port=8080\n\n");
        assert_eq!(file.content.len(), 3);
        match &file.content[1] {
            PropertiesContent::Comment(c) => {
                assert_eq!(c.delimiter, '!');
                assert_eq!(c.message, " legacy");
            }
            PropertiesContent::Entry(_) => panic!("Expected comment"),
        }
        assert_eq!(file.eof, "\n\n");
    }

    #[test]
    fn test_continuation_lines() {
        let file = roundtrip("list=a, \\\n    b, \\\n    c\nnext=1\n");
        let list = file.get("list").unwrap();
        assert_eq!(list.value.value(), "a, b, c");
        assert_eq!(file.get("next").unwrap().value.text, "1");
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let file = roundtrip("path=c:\\\\\nnext=1\n");
        assert_eq!(file.get("path").unwrap().value.value(), "c:\\");
        assert!(file.get("next").is_some());
    }

    #[test]
    fn test_escaped_delimiter_in_key() {
        let file = roundtrip("a\\=b=c\n");
        let entry = file.entries().next().unwrap();
        assert_eq!(entry.key, "a\\=b");
        assert_eq!(entry.key_text(), "a=b");
        assert_eq!(entry.value.text, "c");
    }

    #[test]
    fn test_crlf_and_no_trailing_newline() {
        let file = roundtrip("a=1\r\nb=2");
        assert_eq!(file.get("a").unwrap().value.text, "1");
        assert_eq!(file.get("b").unwrap().value.text, "2");
        assert_eq!(file.eof, "");
    }

    #[test]
    fn test_indented_entries() {
        let file = roundtrip("  spring.application.name = demo\n");
        let entry = file.get("spring.application.name").unwrap();
        assert_eq!(entry.prefix, "  ");
        assert_eq!(entry.value.value(), "demo");
    }

    #[test]
    fn test_empty_file() {
        let file = roundtrip("");
        assert!(file.content.is_empty());
    }
}

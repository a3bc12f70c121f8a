use crate::markers::{Markers, SearchResult};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// A parsed `.properties` file.
///
/// Like the YAML tree, every node keeps the whitespace in front of it so a
/// parsed file prints back to its exact text.
#[derive(Debug, Clone)]
pub struct PropertiesFile {
    pub source_path: PathBuf,
    pub markers: Markers,
    pub content: Vec<PropertiesContent>,
    /// Whitespace after the last entry or comment.
    pub eof: String,
}

#[derive(Debug, Clone)]
pub enum PropertiesContent {
    Entry(Rc<PropertyEntry>),
    Comment(Rc<Comment>),
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub prefix: String,
    /// `#` or `!`.
    pub delimiter: char,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Equals,
    Colon,
    /// The key and value are separated by whitespace only.
    None,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Equals => "=",
            Delimiter::Colon => ":",
            Delimiter::None => "",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyEntry {
    pub prefix: String,
    /// The key as written, escapes included.
    pub key: String,
    pub before_delimiter: String,
    pub delimiter: Delimiter,
    pub value: Rc<PropertyValue>,
}

#[derive(Debug, Clone)]
pub struct PropertyValue {
    pub prefix: String,
    /// The value as written, escapes and line continuations included.
    pub text: String,
    pub markers: Markers,
}

impl PropertiesFile {
    pub fn print(&self) -> String {
        super::printer::print_file(self)
    }

    pub fn with_content(&self, content: Vec<PropertiesContent>) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Rc<PropertyEntry>> {
        self.content.iter().filter_map(|c| match c {
            PropertiesContent::Entry(e) => Some(e),
            PropertiesContent::Comment(_) => None,
        })
    }

    /// The last entry whose unescaped key equals `key`, matching the way
    /// later definitions override earlier ones when the file is loaded.
    pub fn get(&self, key: &str) -> Option<&Rc<PropertyEntry>> {
        self.entries().filter(|e| e.key_text() == key).last()
    }
}

impl fmt::Display for PropertiesFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

impl PropertiesContent {
    pub fn ptr_eq(&self, other: &PropertiesContent) -> bool {
        match (self, other) {
            (PropertiesContent::Entry(a), PropertiesContent::Entry(b)) => Rc::ptr_eq(a, b),
            (PropertiesContent::Comment(a), PropertiesContent::Comment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PropertyEntry {
    /// The key with escapes and line continuations resolved.
    pub fn key_text(&self) -> String {
        unescape(&self.key)
    }

    pub fn with_value(self: &Rc<Self>, value: Rc<PropertyValue>) -> Rc<Self> {
        if Rc::ptr_eq(&value, &self.value) {
            return Rc::clone(self);
        }
        Rc::new(PropertyEntry {
            value,
            ..(**self).clone()
        })
    }
}

impl PropertyValue {
    /// The value with escapes and line continuations resolved.
    pub fn value(&self) -> String {
        unescape(&self.text)
    }

    pub fn with_text(self: &Rc<Self>, text: impl Into<String>) -> Rc<Self> {
        let text = text.into();
        if text == self.text {
            return Rc::clone(self);
        }
        Rc::new(PropertyValue {
            text,
            ..(**self).clone()
        })
    }

    /// Already-marked values are returned unchanged.
    pub fn with_search_result(self: &Rc<Self>, result: SearchResult) -> Rc<Self> {
        if self.markers.has::<SearchResult>() {
            return Rc::clone(self);
        }
        Rc::new(PropertyValue {
            markers: self.markers.with(result),
            ..(**self).clone()
        })
    }
}

/// Resolve `\` escapes and line continuations the way `.properties` loaders
/// do. A continuation drops the line break and the next line's leading
/// whitespace.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => {}
            Some('\r') | Some('\n') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                while matches!(chars.peek(), Some(' ' | '\t' | '\x0c')) {
                    chars.next();
                }
            }
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r"a\=b"), "a=b");
        assert_eq!(unescape(r"tab\there"), "tab\there");
        assert_eq!(unescape(r"caf\u00e9"), "café");
        assert_eq!(unescape("one, \\\n    two"), "one, two");
        assert_eq!(unescape("one\\\r\n  two"), "onetwo");
    }

    #[test]
    fn test_with_text_same_text_keeps_identity() {
        let value = Rc::new(PropertyValue {
            prefix: String::new(),
            text: "x".into(),
            markers: Markers::new(),
        });
        assert!(Rc::ptr_eq(&value, &value.with_text("x")));
        assert_eq!(value.with_text("y").text, "y");
    }
}

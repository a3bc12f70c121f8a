//! Lossless YAML parser.
//!
//! Supports block and flow collections, plain, quoted and block scalars,
//! comments, and multi-document streams. Anchors, aliases, tags, directives,
//! complex keys and multi-line plain scalars are rejected with a positioned
//! [`Error::Parse`].

use super::tree::{
    Block, CollectionStyle, Document, DocumentEnd, Documents, Mapping, MappingEntry, Scalar,
    ScalarStyle, Sequence, SequenceEntry,
};
use crate::error::{Error, Result};
use crate::markers::Markers;
use std::path::PathBuf;
use std::rc::Rc;

/// Parse YAML `text` read from `source_path`.
pub fn parse(source_path: impl Into<PathBuf>, text: &str) -> Result<Documents> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        path: source_path.into(),
    };
    let (documents, suffix) = parser.parse_stream()?;
    Ok(Documents {
        source_path: parser.path,
        markers: Markers::new(),
        documents,
        suffix,
    })
}

/// The next significant character after whitespace and comments.
#[derive(Debug, Clone, Copy)]
struct Token {
    pos: usize,
    column: usize,
    /// A line break lies between the cursor and the token.
    newline: bool,
    eof: bool,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    path: PathBuf,
}

impl<'a> Parser<'a> {
    // ── Stream and documents ─────────────────────────────────────────

    fn parse_stream(&mut self) -> Result<(Vec<Rc<Document>>, String)> {
        let mut documents = Vec::new();
        loop {
            let doc = self.parse_document()?;
            let closed = doc.end.explicit;
            documents.push(Rc::new(doc));

            let tok = self.peek();
            if tok.eof {
                let suffix = if closed {
                    self.take_prefix(tok.pos)
                } else {
                    String::new()
                };
                return Ok((documents, suffix));
            }
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        let tok = self.peek();
        let (prefix, explicit) = if self.is_marker(tok, "---") {
            let prefix = self.take_prefix(tok.pos);
            self.pos += 3;
            (prefix, true)
        } else {
            (String::new(), false)
        };

        let tok = self.peek();
        let block = if tok.eof || self.is_marker(tok, "---") || self.is_marker(tok, "...") {
            Block::empty()
        } else {
            self.parse_block_node(tok, -1)?
        };

        let tok = self.peek();
        let end = if self.is_marker(tok, "...") {
            let prefix = self.take_prefix(tok.pos);
            self.pos += 3;
            DocumentEnd {
                prefix,
                explicit: true,
            }
        } else if tok.eof || self.is_marker(tok, "---") {
            DocumentEnd {
                prefix: self.take_prefix(tok.pos),
                explicit: false,
            }
        } else {
            return Err(self.error(tok.pos, "unexpected content after document body"));
        };

        Ok(Document {
            prefix,
            explicit,
            block,
            end,
        })
    }

    // ── Block context ────────────────────────────────────────────────

    /// Parse any block-context node starting at `tok`. `parent_indent` is the
    /// column of the enclosing collection, used to delimit block scalars.
    fn parse_block_node(&mut self, tok: Token, parent_indent: isize) -> Result<Block> {
        match self.byte(tok.pos) {
            b'-' if self.is_dash_indicator(tok.pos) => Ok(Block::Sequence(
                self.parse_block_sequence(tok.column)?,
            )),
            b'[' | b'{' => self.parse_flow_node(tok),
            b'|' | b'>' => self.parse_block_scalar(tok, parent_indent),
            _ if self.is_mapping_key(tok.pos) => {
                Ok(Block::Mapping(self.parse_block_mapping(tok.column)?))
            }
            _ => Ok(Block::Scalar(self.parse_scalar(tok, false)?)),
        }
    }

    /// A value on the same line as its key: no nested block collections.
    fn parse_inline_node(&mut self, tok: Token, parent_indent: isize) -> Result<Block> {
        match self.byte(tok.pos) {
            b'-' if self.is_dash_indicator(tok.pos) => {
                Err(self.error(tok.pos, "block sequence entries are not allowed here"))
            }
            b'[' | b'{' => self.parse_flow_node(tok),
            b'|' | b'>' => self.parse_block_scalar(tok, parent_indent),
            _ if self.is_mapping_key(tok.pos) => {
                Err(self.error(tok.pos, "mapping values are not allowed here"))
            }
            _ => Ok(Block::Scalar(self.parse_scalar(tok, false)?)),
        }
    }

    fn parse_block_mapping(&mut self, col: usize) -> Result<Rc<Mapping>> {
        let mut entries = Vec::new();
        loop {
            let tok = self.peek();
            if !entries.is_empty() {
                if tok.eof || tok.column < col || self.is_any_marker(tok) {
                    break;
                }
                if !tok.newline {
                    return Err(self.error(tok.pos, "unexpected content after mapping value"));
                }
                if tok.column > col {
                    return Err(self.error(tok.pos, "bad indentation of a mapping entry"));
                }
                if self.is_dash_indicator(tok.pos) {
                    break;
                }
            }
            if !self.is_mapping_key(tok.pos) {
                return Err(self.error(tok.pos, "expected a mapping key"));
            }

            let prefix = self.take_prefix(tok.pos);
            let key = self.parse_key()?;
            let before_colon = self.take_inline_space();
            self.pos += 1; // ':'
            let value = self.parse_entry_value(col)?;
            entries.push(Rc::new(MappingEntry {
                prefix,
                key,
                before_colon,
                value,
                trailing_comma: None,
            }));
        }
        Ok(Rc::new(Mapping {
            style: CollectionStyle::Block,
            entries,
        }))
    }

    fn parse_entry_value(&mut self, col: usize) -> Result<Block> {
        let tok = self.peek();
        if tok.eof || self.is_any_marker(tok) {
            return Ok(Block::empty());
        }
        if !tok.newline {
            return self.parse_inline_node(tok, col as isize);
        }
        if tok.column > col {
            return self.parse_block_node(tok, col as isize);
        }
        if tok.column == col && self.is_dash_indicator(tok.pos) {
            return Ok(Block::Sequence(self.parse_block_sequence(col)?));
        }
        Ok(Block::empty())
    }

    fn parse_block_sequence(&mut self, col: usize) -> Result<Rc<Sequence>> {
        let mut entries = Vec::new();
        loop {
            let tok = self.peek();
            if !entries.is_empty() {
                if tok.eof || tok.column < col || self.is_any_marker(tok) {
                    break;
                }
                if !self.is_dash_indicator(tok.pos) {
                    if tok.column == col {
                        break;
                    }
                    return Err(self.error(tok.pos, "bad indentation of a sequence entry"));
                }
                if tok.column > col {
                    return Err(self.error(tok.pos, "bad indentation of a sequence entry"));
                }
            }

            let prefix = self.take_prefix(tok.pos);
            self.pos += 1; // '-'
            let item = self.peek();
            let block = if item.eof || self.is_any_marker(item) {
                Block::empty()
            } else if !item.newline || item.column > col {
                self.parse_block_node(item, col as isize)?
            } else {
                Block::empty()
            };
            entries.push(Rc::new(SequenceEntry {
                prefix,
                dash: true,
                block,
                trailing_comma: None,
            }));
        }
        Ok(Rc::new(Sequence {
            style: CollectionStyle::Block,
            entries,
        }))
    }

    fn parse_block_scalar(&mut self, tok: Token, parent_indent: isize) -> Result<Block> {
        let prefix = self.take_prefix(tok.pos);
        let style = if self.byte(tok.pos) == b'|' {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Folded
        };
        let start = self.pos + 1;

        // header runs to the end of the indicator line
        let mut end = self.line_end(start);
        let mut cursor = end;
        while cursor < self.src.len() {
            let line_start = cursor + 1;
            if line_start > self.src.len() {
                break;
            }
            let line_end = self.line_end(line_start);
            let line = &self.src[line_start..line_end];
            let indent = line.len() - line.trim_start_matches(' ').len();
            if line.trim().is_empty() {
                cursor = line_end;
                continue;
            }
            if indent as isize <= parent_indent || (indent == 0 && self.starts_marker(line_start))
            {
                break;
            }
            end = line_end;
            cursor = line_end;
        }

        let value = self.src[start..end].to_string();
        self.pos = end;
        Ok(Block::Scalar(Rc::new(Scalar {
            prefix,
            style,
            value,
            markers: Markers::new(),
        })))
    }

    // ── Flow context ─────────────────────────────────────────────────

    fn parse_flow_node(&mut self, tok: Token) -> Result<Block> {
        match self.byte(tok.pos) {
            b'[' => self.parse_flow_sequence(tok).map(Block::Sequence),
            b'{' => self.parse_flow_mapping(tok).map(Block::Mapping),
            _ => Ok(Block::Scalar(self.parse_scalar(tok, true)?)),
        }
    }

    fn parse_flow_sequence(&mut self, tok: Token) -> Result<Rc<Sequence>> {
        let opening_prefix = self.take_prefix(tok.pos);
        self.pos += 1; // '['
        let mut entries = Vec::new();
        let closing_prefix = loop {
            let tok = self.peek();
            if tok.eof {
                return Err(self.error(tok.pos, "unterminated flow sequence"));
            }
            if self.byte(tok.pos) == b']' {
                let closing = self.take_prefix(tok.pos);
                self.pos += 1;
                break closing;
            }

            let prefix = self.take_prefix(tok.pos);
            let item = self.peek();
            let block = self.parse_flow_node(item)?;
            let trailing_comma = self.take_flow_separator(b']')?;
            entries.push(Rc::new(SequenceEntry {
                prefix,
                dash: false,
                block,
                trailing_comma,
            }));
        };
        Ok(Rc::new(Sequence {
            style: CollectionStyle::Flow {
                opening_prefix,
                closing_prefix,
            },
            entries,
        }))
    }

    fn parse_flow_mapping(&mut self, tok: Token) -> Result<Rc<Mapping>> {
        let opening_prefix = self.take_prefix(tok.pos);
        self.pos += 1; // '{'
        let mut entries = Vec::new();
        let closing_prefix = loop {
            let tok = self.peek();
            if tok.eof {
                return Err(self.error(tok.pos, "unterminated flow mapping"));
            }
            if self.byte(tok.pos) == b'}' {
                let closing = self.take_prefix(tok.pos);
                self.pos += 1;
                break closing;
            }

            let prefix = self.take_prefix(tok.pos);
            let key = self.parse_flow_key()?;
            let before_colon = self.take_inline_space();
            if self.byte(self.pos) != b':' {
                return Err(self.error(self.pos, "expected ':' in flow mapping"));
            }
            self.pos += 1;
            let value_tok = self.peek();
            if value_tok.eof {
                return Err(self.error(value_tok.pos, "unterminated flow mapping"));
            }
            let value = match self.byte(value_tok.pos) {
                b',' | b'}' => Block::empty(),
                _ => self.parse_flow_node(value_tok)?,
            };
            let trailing_comma = self.take_flow_separator(b'}')?;
            entries.push(Rc::new(MappingEntry {
                prefix,
                key,
                before_colon,
                value,
                trailing_comma,
            }));
        };
        Ok(Rc::new(Mapping {
            style: CollectionStyle::Flow {
                opening_prefix,
                closing_prefix,
            },
            entries,
        }))
    }

    /// After a flow item: consume `,` (returning the whitespace before it) or
    /// leave the closing delimiter for the caller.
    fn take_flow_separator(&mut self, closing: u8) -> Result<Option<String>> {
        let tok = self.peek();
        if tok.eof {
            return Err(self.error(tok.pos, "unterminated flow collection"));
        }
        match self.byte(tok.pos) {
            b',' => {
                let ws = self.take_prefix(tok.pos);
                self.pos += 1;
                Ok(Some(ws))
            }
            c if c == closing => Ok(None),
            _ => Err(self.error(tok.pos, "expected ',' or end of flow collection")),
        }
    }

    fn parse_flow_key(&mut self) -> Result<Rc<Scalar>> {
        let tok = Token {
            pos: self.pos,
            column: 0,
            newline: false,
            eof: false,
        };
        self.parse_scalar(tok, true)
    }

    // ── Scalars ──────────────────────────────────────────────────────

    fn parse_key(&mut self) -> Result<Rc<Scalar>> {
        let tok = Token {
            pos: self.pos,
            column: 0,
            newline: false,
            eof: false,
        };
        self.parse_scalar(tok, false)
    }

    fn parse_scalar(&mut self, tok: Token, flow: bool) -> Result<Rc<Scalar>> {
        self.reject_unsupported(tok.pos)?;
        let prefix = self.take_prefix(tok.pos);
        let (style, value) = match self.byte(self.pos) {
            q @ (b'\'' | b'"') => {
                let end = self.scan_quoted(self.pos)?;
                let value = self.src[self.pos + 1..end - 1].to_string();
                self.pos = end;
                let style = if q == b'\'' {
                    ScalarStyle::SingleQuoted
                } else {
                    ScalarStyle::DoubleQuoted
                };
                (style, value)
            }
            _ => {
                let end = self.scan_plain(self.pos, flow);
                if end == self.pos {
                    return Err(self.error(self.pos, "expected a scalar"));
                }
                let value = self.src[self.pos..end].to_string();
                self.pos = end;
                (ScalarStyle::Plain, value)
            }
        };
        Ok(Rc::new(Scalar {
            prefix,
            style,
            value,
            markers: Markers::new(),
        }))
    }

    fn reject_unsupported(&self, pos: usize) -> Result<()> {
        let msg = match self.byte(pos) {
            b'&' => "anchors are not supported",
            b'*' => "aliases are not supported",
            b'!' => "tags are not supported",
            b'%' => "directives are not supported",
            b'@' | b'`' => "reserved indicator",
            b'?' if self.is_blank_or_end(pos + 1) => "complex keys are not supported",
            _ => return Ok(()),
        };
        Err(self.error(pos, msg))
    }

    /// End offset (exclusive) of a quoted scalar starting at `start`.
    fn scan_quoted(&self, start: usize) -> Result<usize> {
        let bytes = self.src.as_bytes();
        let quote = bytes[start];
        let mut i = start + 1;
        while i < bytes.len() {
            let c = bytes[i];
            if quote == b'\'' {
                if c == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    return Ok(i + 1);
                }
            } else if c == b'\\' {
                i += 2;
                continue;
            } else if c == b'"' {
                return Ok(i + 1);
            }
            i += 1;
        }
        Err(self.error(start, "unterminated quoted scalar"))
    }

    /// End offset (exclusive, trailing blanks trimmed) of a plain scalar.
    fn scan_plain(&self, start: usize, flow: bool) -> usize {
        let bytes = self.src.as_bytes();
        let mut i = start;
        let mut end = start;
        while i < bytes.len() {
            let c = bytes[i];
            if c == b'\n' || c == b'\r' {
                break;
            }
            if c == b':' {
                let next = bytes.get(i + 1).copied();
                let terminates = match next {
                    None => true,
                    Some(n) => {
                        is_blank(n) || (flow && matches!(n, b',' | b']' | b'}' | b'[' | b'{'))
                    }
                };
                if terminates {
                    break;
                }
            }
            if c == b'#' && i > start && is_blank(bytes[i - 1]) {
                break;
            }
            if flow && matches!(c, b',' | b'[' | b']' | b'{' | b'}') {
                break;
            }
            i += 1;
            if c != b' ' && c != b'\t' {
                end = i;
            }
        }
        end
    }

    /// Whether a block mapping key followed by `:` starts at `pos`.
    fn is_mapping_key(&self, pos: usize) -> bool {
        if pos >= self.src.len() {
            return false;
        }
        let end = match self.byte(pos) {
            b'\'' | b'"' => match self.scan_quoted(pos) {
                Ok(end) => end,
                Err(_) => return false,
            },
            b'[' | b'{' | b'#' | b'|' | b'>' => return false,
            _ => self.scan_plain(pos, false),
        };
        if end == pos {
            return false;
        }
        let bytes = self.src.as_bytes();
        let mut i = end;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        i < bytes.len() && bytes[i] == b':' && self.is_blank_or_end(i + 1)
    }

    // ── Low-level scanning ───────────────────────────────────────────

    fn byte(&self, pos: usize) -> u8 {
        self.src.as_bytes().get(pos).copied().unwrap_or(0)
    }

    fn is_blank_or_end(&self, pos: usize) -> bool {
        match self.src.as_bytes().get(pos) {
            None => true,
            Some(&c) => is_blank(c),
        }
    }

    fn is_dash_indicator(&self, pos: usize) -> bool {
        self.byte(pos) == b'-' && self.is_blank_or_end(pos + 1)
    }

    fn starts_marker(&self, pos: usize) -> bool {
        let rest = &self.src[pos..];
        (rest.starts_with("---") || rest.starts_with("...")) && self.is_blank_or_end(pos + 3)
    }

    fn is_marker(&self, tok: Token, marker: &str) -> bool {
        !tok.eof
            && tok.column == 0
            && self.src[tok.pos..].starts_with(marker)
            && self.is_blank_or_end(tok.pos + marker.len())
    }

    fn is_any_marker(&self, tok: Token) -> bool {
        self.is_marker(tok, "---") || self.is_marker(tok, "...")
    }

    /// Locate the next significant character without consuming anything.
    fn peek(&self) -> Token {
        let bytes = self.src.as_bytes();
        let mut i = self.pos;
        let mut newline = false;
        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' | b'\r' => i += 1,
                b'\n' => {
                    newline = true;
                    i += 1;
                }
                b'#' if i == 0 || is_blank(bytes[i - 1]) => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
                _ => break,
            }
        }
        Token {
            pos: i,
            column: i - self.line_start(i),
            newline,
            eof: i >= bytes.len(),
        }
    }

    fn take_prefix(&mut self, upto: usize) -> String {
        let prefix = self.src[self.pos..upto].to_string();
        self.pos = upto;
        prefix
    }

    fn take_inline_space(&mut self) -> String {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && (bytes[self.pos] == b' ' || bytes[self.pos] == b'\t') {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn line_start(&self, pos: usize) -> usize {
        self.src[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.src[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.src.len())
    }

    fn error(&self, pos: usize, message: &str) -> Error {
        let pos = pos.min(self.src.len());
        let line = self.src[..pos].matches('\n').count() + 1;
        Error::Parse {
            path: self.path.clone(),
            line,
            column: pos - self.line_start(pos) + 1,
            message: message.to_string(),
        }
    }
}

fn is_blank(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) -> Documents {
        let docs = parse("test.yml", text).unwrap();
        assert_eq!(docs.print(), text);
        docs
    }

    fn root_mapping(docs: &Documents) -> Rc<Mapping> {
        docs.documents[0].block.as_mapping().unwrap().clone()
    }

    #[test]
    fn test_nested_mapping() {
        let docs = roundtrip("spring:\n  application:\n    name: test\n");
        let root = root_mapping(&docs);
        let spring = root.get("spring").unwrap();
        let app = spring.value.as_mapping().unwrap().get("application").unwrap();
        let name = app.value.as_mapping().unwrap().get("name").unwrap();
        let scalar = name.value.as_scalar().unwrap();
        assert_eq!(scalar.value, "test");
        assert_eq!(scalar.prefix, " ");
        assert_eq!(name.prefix, "\n    ");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let docs = roundtrip(
            "# leading comment\nserver:\n  port: 8080 # trailing\n\n  # inner\n  address: 0.0.0.0\n",
        );
        let server = root_mapping(&docs).get("server").unwrap().clone();
        let server = server.value.as_mapping().unwrap();
        assert_eq!(server.entries.len(), 2);
        assert_eq!(
            server.get("port").unwrap().value.as_scalar().unwrap().value,
            "8080"
        );
        assert_eq!(
            server.get("address").unwrap().value.as_scalar().unwrap().value,
            "0.0.0.0"
        );
    }

    #[test]
    fn test_dotted_key_and_quoted_values() {
        let docs = roundtrip("spring.application.name: 'my app'\nother: \"a \\\" b\"\n");
        let root = root_mapping(&docs);
        let name = root.get("spring.application.name").unwrap();
        let scalar = name.value.as_scalar().unwrap();
        assert_eq!(scalar.style, ScalarStyle::SingleQuoted);
        assert_eq!(scalar.value, "my app");
        let other = root.get("other").unwrap().value.as_scalar().unwrap().clone();
        assert_eq!(other.style, ScalarStyle::DoubleQuoted);
        assert_eq!(other.value, "a \\\" b");
    }

    #[test]
    fn test_block_sequences() {
        let docs = roundtrip("list:\n  - a\n  - b: 1\n    c: 2\nsame:\n- x\n- y\nafter: z\n");
        let root = root_mapping(&docs);
        let list = root.get("list").unwrap().value.as_sequence().unwrap().clone();
        assert_eq!(list.entries.len(), 2);
        let second = list.entries[1].block.as_mapping().unwrap();
        assert_eq!(second.entries.len(), 2);
        let same = root.get("same").unwrap().value.as_sequence().unwrap().clone();
        assert_eq!(same.entries.len(), 2);
        assert!(root.get("after").is_some());
    }

    #[test]
    fn test_flow_collections() {
        let docs = roundtrip("ports: [80, 443 ,8080]\nlabels: {app: web, tier: 'front'}\n");
        let root = root_mapping(&docs);
        let ports = root.get("ports").unwrap().value.as_sequence().unwrap().clone();
        assert_eq!(ports.entries.len(), 3);
        assert_eq!(ports.entries[1].trailing_comma.as_deref(), Some(" "));
        let labels = root.get("labels").unwrap().value.as_mapping().unwrap().clone();
        assert_eq!(
            labels.get("tier").unwrap().value.as_scalar().unwrap().value,
            "front"
        );
    }

    #[test]
    fn test_empty_flow_collections() {
        roundtrip("a: []\nb: {}\nc: [ ]\n");
    }

    #[test]
    fn test_block_scalars() {
        let docs = roundtrip("script: |\n  echo one\n  echo two\n\nnext: >-\n  folded\n  text\nlast: 1\n");
        let root = root_mapping(&docs);
        let script = root.get("script").unwrap().value.as_scalar().unwrap().clone();
        assert_eq!(script.style, ScalarStyle::Literal);
        assert_eq!(script.value, "\n  echo one\n  echo two");
        let next = root.get("next").unwrap().value.as_scalar().unwrap().clone();
        assert_eq!(next.style, ScalarStyle::Folded);
        assert!(root.get("last").is_some());
    }

    #[test]
    fn test_empty_values() {
        let docs = roundtrip("a:\nb:\n  c:\nd: 1\n");
        let root = root_mapping(&docs);
        assert_eq!(root.get("a").unwrap().value.as_scalar().unwrap().value, "");
        assert!(root.get("b").unwrap().value.as_mapping().is_some());
    }

    #[test]
    fn test_multiple_documents() {
        let docs = roundtrip("a: 1\n---\nb: 2\n...\n# trailer\n");
        assert_eq!(docs.documents.len(), 2);
        assert!(docs.documents[1].explicit);
        assert!(docs.documents[1].end.explicit);
        assert_eq!(docs.suffix, "\n# trailer\n");
    }

    #[test]
    fn test_leading_document_marker() {
        let docs = roundtrip("---\nspring:\n  profiles: dev\n");
        assert_eq!(docs.documents.len(), 1);
        assert!(docs.documents[0].explicit);
    }

    #[test]
    fn test_empty_and_comment_only_files() {
        let empty = roundtrip("");
        assert_eq!(empty.documents.len(), 1);
        let comments = roundtrip("# nothing here\n");
        assert_eq!(comments.documents[0].end.prefix, "# nothing here\n");
    }

    #[test]
    fn test_top_level_scalar_and_sequence() {
        roundtrip("just text\n");
        roundtrip("- 1\n- 2\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        roundtrip("a:\r\n  b: c\r\n");
    }

    #[test]
    fn test_value_containing_hash_and_colon() {
        let docs = roundtrip("url: http://example.com/#frag\n");
        let url = root_mapping(&docs).get("url").unwrap().clone();
        assert_eq!(
            url.value.as_scalar().unwrap().value,
            "http://example.com/#frag"
        );
    }

    #[test]
    fn test_rejects_anchor() {
        let err = parse("test.yml", "a: &anchor 1\n").unwrap_err();
        match err {
            Error::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 4);
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_indentation() {
        assert!(parse("test.yml", "a:\n    b: 1\n  c: 2\n").is_err());
    }

    #[test]
    fn test_rejects_unterminated_quote() {
        assert!(parse("test.yml", "a: 'open\n").is_err());
    }

    #[test]
    fn test_rejects_nested_mapping_on_one_line() {
        assert!(parse("test.yml", "a: b: c\n").is_err());
    }
}

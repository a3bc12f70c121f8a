use crate::markers::{Markers, SearchResult};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

// ============================================================================
// Source file
// ============================================================================

/// A parsed YAML source file: one or more documents.
///
/// Every node keeps the whitespace and comments that precede it in a
/// `prefix`, so printing a freshly parsed file reproduces its text exactly.
/// Nodes are immutable and shared through `Rc`; an edit produces new nodes
/// along the path from the root to the edited node and reuses everything
/// else.
#[derive(Debug, Clone)]
pub struct Documents {
    pub source_path: PathBuf,
    pub markers: Markers,
    pub documents: Vec<Rc<Document>>,
    /// Text after the last explicit `...` document end marker.
    pub suffix: String,
}

/// A single YAML document.
#[derive(Debug, Clone)]
pub struct Document {
    pub prefix: String,
    /// `true` when the document opens with an explicit `---`.
    pub explicit: bool,
    pub block: Block,
    pub end: DocumentEnd,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentEnd {
    pub prefix: String,
    /// `true` when the document closes with an explicit `...`.
    pub explicit: bool,
}

// ============================================================================
// Blocks
// ============================================================================

/// A node that can appear as a document body, a mapping value, or a sequence
/// item.
#[derive(Debug, Clone)]
pub enum Block {
    Mapping(Rc<Mapping>),
    Sequence(Rc<Sequence>),
    Scalar(Rc<Scalar>),
}

/// Block collections are indentation based; flow collections are delimited by
/// braces or brackets whose preceding whitespace is kept here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStyle {
    Block,
    Flow {
        opening_prefix: String,
        closing_prefix: String,
    },
}

#[derive(Debug, Clone)]
pub struct Mapping {
    pub style: CollectionStyle,
    pub entries: Vec<Rc<MappingEntry>>,
}

#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub prefix: String,
    pub key: Rc<Scalar>,
    /// Whitespace between the key and the `:` indicator.
    pub before_colon: String,
    pub value: Block,
    /// Whitespace before a trailing `,` in flow mappings.
    pub trailing_comma: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Sequence {
    pub style: CollectionStyle,
    pub entries: Vec<Rc<SequenceEntry>>,
}

#[derive(Debug, Clone)]
pub struct SequenceEntry {
    pub prefix: String,
    /// `true` for block entries introduced by `-`.
    pub dash: bool,
    pub block: Block,
    pub trailing_comma: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// A scalar's text is stored raw: the characters between the quotes for
/// quoted styles, and everything after the `|` or `>` indicator (header and
/// indented lines) for block styles. No escape processing takes place.
#[derive(Debug, Clone)]
pub struct Scalar {
    pub prefix: String,
    pub style: ScalarStyle,
    pub value: String,
    pub markers: Markers,
}

// ============================================================================
// Node handle
// ============================================================================

/// A handle to any YAML node. Two handles are the *same node* when
/// [`Yaml::ptr_eq`] holds; structurally equal nodes at different positions are
/// distinct.
#[derive(Debug, Clone)]
pub enum Yaml {
    Document(Rc<Document>),
    Mapping(Rc<Mapping>),
    MappingEntry(Rc<MappingEntry>),
    Sequence(Rc<Sequence>),
    SequenceEntry(Rc<SequenceEntry>),
    Scalar(Rc<Scalar>),
}

impl Yaml {
    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Yaml) -> bool {
        match (self, other) {
            (Yaml::Document(a), Yaml::Document(b)) => Rc::ptr_eq(a, b),
            (Yaml::Mapping(a), Yaml::Mapping(b)) => Rc::ptr_eq(a, b),
            (Yaml::MappingEntry(a), Yaml::MappingEntry(b)) => Rc::ptr_eq(a, b),
            (Yaml::Sequence(a), Yaml::Sequence(b)) => Rc::ptr_eq(a, b),
            (Yaml::SequenceEntry(a), Yaml::SequenceEntry(b)) => Rc::ptr_eq(a, b),
            (Yaml::Scalar(a), Yaml::Scalar(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Yaml::Document(_) => "document",
            Yaml::Mapping(_) => "mapping",
            Yaml::MappingEntry(_) => "mapping entry",
            Yaml::Sequence(_) => "sequence",
            Yaml::SequenceEntry(_) => "sequence entry",
            Yaml::Scalar(_) => "scalar",
        }
    }

    pub fn into_document(self) -> Option<Rc<Document>> {
        match self {
            Yaml::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_block(self) -> Option<Block> {
        match self {
            Yaml::Mapping(m) => Some(Block::Mapping(m)),
            Yaml::Sequence(s) => Some(Block::Sequence(s)),
            Yaml::Scalar(s) => Some(Block::Scalar(s)),
            _ => None,
        }
    }

    pub fn into_mapping_entry(self) -> Option<Rc<MappingEntry>> {
        match self {
            Yaml::MappingEntry(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_sequence_entry(self) -> Option<Rc<SequenceEntry>> {
        match self {
            Yaml::SequenceEntry(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> Option<Rc<Scalar>> {
        match self {
            Yaml::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Block> for Yaml {
    fn from(block: Block) -> Self {
        match block {
            Block::Mapping(m) => Yaml::Mapping(m),
            Block::Sequence(s) => Yaml::Sequence(s),
            Block::Scalar(s) => Yaml::Scalar(s),
        }
    }
}

// ============================================================================
// Convenience methods
// ============================================================================

impl Documents {
    /// Serialize back to YAML text.
    pub fn print(&self) -> String {
        super::printer::print_documents(self)
    }

    /// Return a copy with `documents` replaced, keeping path and markers.
    pub fn with_documents(&self, documents: Vec<Rc<Document>>) -> Self {
        Self {
            documents,
            ..self.clone()
        }
    }
}

impl fmt::Display for Documents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

impl Document {
    pub fn with_block(self: &Rc<Self>, block: Block) -> Rc<Self> {
        if block.ptr_eq(&self.block) {
            return Rc::clone(self);
        }
        Rc::new(Document {
            block,
            ..(**self).clone()
        })
    }
}

impl Block {
    /// An empty plain scalar, used for `key:` with no value.
    pub fn empty() -> Self {
        Block::Scalar(Rc::new(Scalar::plain("", "")))
    }

    pub fn ptr_eq(&self, other: &Block) -> bool {
        match (self, other) {
            (Block::Mapping(a), Block::Mapping(b)) => Rc::ptr_eq(a, b),
            (Block::Sequence(a), Block::Sequence(b)) => Rc::ptr_eq(a, b),
            (Block::Scalar(a), Block::Scalar(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_mapping(&self) -> Option<&Rc<Mapping>> {
        match self {
            Block::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Rc<Sequence>> {
        match self {
            Block::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Rc<Scalar>> {
        match self {
            Block::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl Mapping {
    /// The first entry whose key text equals `key`.
    pub fn get(&self, key: &str) -> Option<&Rc<MappingEntry>> {
        self.entries.iter().find(|e| e.key.value == key)
    }

    pub fn with_entries(self: &Rc<Self>, entries: Vec<Rc<MappingEntry>>) -> Rc<Self> {
        Rc::new(Mapping {
            style: self.style.clone(),
            entries,
        })
    }
}

impl MappingEntry {
    pub fn key_text(&self) -> &str {
        &self.key.value
    }

    pub fn with_value(self: &Rc<Self>, value: Block) -> Rc<Self> {
        if value.ptr_eq(&self.value) {
            return Rc::clone(self);
        }
        Rc::new(MappingEntry {
            value,
            ..(**self).clone()
        })
    }
}

impl Sequence {
    pub fn with_entries(self: &Rc<Self>, entries: Vec<Rc<SequenceEntry>>) -> Rc<Self> {
        Rc::new(Sequence {
            style: self.style.clone(),
            entries,
        })
    }
}

impl SequenceEntry {
    pub fn with_block(self: &Rc<Self>, block: Block) -> Rc<Self> {
        if block.ptr_eq(&self.block) {
            return Rc::clone(self);
        }
        Rc::new(SequenceEntry {
            block,
            ..(**self).clone()
        })
    }
}

impl Scalar {
    pub fn plain(prefix: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            style: ScalarStyle::Plain,
            value: value.into(),
            markers: Markers::new(),
        }
    }

    /// A copy with new text, keeping prefix, style and markers. Returns the
    /// same node when the text is unchanged.
    pub fn with_value(self: &Rc<Self>, value: impl Into<String>) -> Rc<Self> {
        let value = value.into();
        if value == self.value {
            return Rc::clone(self);
        }
        Rc::new(Scalar {
            value,
            ..(**self).clone()
        })
    }

    /// Mark this scalar as a search hit. Already-marked scalars are returned
    /// unchanged.
    pub fn with_search_result(self: &Rc<Self>, result: SearchResult) -> Rc<Self> {
        if self.markers.has::<SearchResult>() {
            return Rc::clone(self);
        }
        Rc::new(Scalar {
            markers: self.markers.with(result),
            ..(**self).clone()
        })
    }
}

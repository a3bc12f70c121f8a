//! Out-of-band data attached to tree nodes and source files.

use std::any::Any;
use std::fmt;
use std::path::{Component, Path};
use std::rc::Rc;

/// A piece of metadata that can ride along on a node without changing the
/// text the node prints (except for [`SearchResult`], which the printers
/// render explicitly).
pub trait Marker: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
}

/// An immutable bag of markers. Adding a marker returns a new bag.
#[derive(Clone, Default)]
pub struct Markers {
    entries: Vec<Rc<dyn Marker>>,
}

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return a copy of this bag with `marker` appended.
    pub fn with(&self, marker: impl Marker) -> Self {
        let mut entries = self.entries.clone();
        entries.push(Rc::new(marker));
        Self { entries }
    }

    /// The first marker of type `T`, if any.
    pub fn find_first<T: Marker>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|m| m.as_any().downcast_ref::<T>())
    }

    pub fn has<T: Marker>(&self) -> bool {
        self.find_first::<T>().is_some()
    }
}

impl fmt::Debug for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// Flags a node as matched by a search. Printed as `~~>` in front of the
/// node's text, or `~~(description)~~>` when a description is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub description: Option<String>,
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }

    /// The inline text the printers emit for this marker.
    pub fn render(&self) -> String {
        match &self.description {
            Some(desc) => format!("~~({})~~>", desc),
            None => "~~>".to_string(),
        }
    }
}

impl Marker for SearchResult {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The build source set a file belongs to (`main`, `test`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub name: String,
}

impl SourceSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Derive the source set from a project-relative path laid out as
    /// `[module/...]src/<name>/...`. The last `src` component wins, so nested
    /// modules resolve to their own source set.
    pub fn from_path(path: &Path) -> Option<Self> {
        let parts: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let idx = parts.iter().rposition(|p| *p == "src")?;
        // `src/<name>` must be followed by something inside the source set
        if idx + 2 < parts.len() {
            Some(Self::new(parts[idx + 1]))
        } else {
            None
        }
    }
}

impl Marker for SourceSet {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

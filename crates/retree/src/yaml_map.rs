//! A map-like view over an immutable YAML tree.
//!
//! Navigating with [`YamlMap::get`] allocates a new view that remembers the
//! view it came from. Writing a scalar through [`YamlMap::set_value`] rebuilds
//! every ancestor along that chain, so the root view ends up holding the
//! edited tree while every node off the edited path is shared with the
//! original.
//!
//! Missing keys never fail: they yield a shared empty view whose value is
//! `None`, and navigating further from it stays empty.

use crate::error::{Error, Result};
use crate::yaml::tree::{Block, Document, Mapping, Yaml};
use crate::yaml::visitor::substitute;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

thread_local! {
    static EMPTY: YamlMap = YamlMap(Rc::new(View {
        parent: None,
        yaml: RefCell::new(None),
    }));
}

/// A view over one node of a YAML tree. Cloning a view is cheap and the clone
/// observes the same node.
#[derive(Clone)]
pub struct YamlMap(Rc<View>);

struct View {
    parent: Option<YamlMap>,
    /// `None` for the "not found" view.
    yaml: RefCell<Option<Yaml>>,
}

impl YamlMap {
    /// A root view over a document.
    pub fn build(document: &Rc<Document>) -> YamlMap {
        YamlMap::root(Yaml::Document(Rc::clone(document)))
    }

    /// A root view over a mapping.
    pub fn build_mapping(mapping: &Rc<Mapping>) -> YamlMap {
        YamlMap::root(Yaml::Mapping(Rc::clone(mapping)))
    }

    /// The shared view returned for anything that is not there.
    pub fn empty() -> YamlMap {
        EMPTY.with(YamlMap::clone)
    }

    fn root(yaml: Yaml) -> YamlMap {
        YamlMap(Rc::new(View {
            parent: None,
            yaml: RefCell::new(Some(yaml)),
        }))
    }

    fn child(&self, yaml: Yaml) -> YamlMap {
        YamlMap(Rc::new(View {
            parent: Some(self.clone()),
            yaml: RefCell::new(Some(yaml)),
        }))
    }

    /// The node this view currently points at.
    pub fn yaml(&self) -> Option<Yaml> {
        self.0.yaml.borrow().clone()
    }

    pub fn document(&self) -> Option<Rc<Document>> {
        self.yaml().and_then(Yaml::into_document)
    }

    /// The backing mapping, looking through a document to its body.
    pub fn mapping(&self) -> Option<Rc<Mapping>> {
        match self.yaml()? {
            Yaml::Mapping(m) => Some(m),
            Yaml::Document(d) => d.block.as_mapping().cloned(),
            _ => None,
        }
    }

    /// `false` only for the "not found" view.
    pub fn exists(&self) -> bool {
        self.0.yaml.borrow().is_some()
    }

    /// A document whose body is a mapping is viewed through a child view over
    /// that mapping, so edits below it propagate into the document.
    fn unwrap_document(&self) -> Option<YamlMap> {
        match self.yaml()? {
            Yaml::Document(d) => match &d.block {
                Block::Mapping(m) => Some(self.child(Yaml::Mapping(Rc::clone(m)))),
                _ => None,
            },
            Yaml::Mapping(_) => Some(self.clone()),
            _ => None,
        }
    }

    /// The value stored under `key`. Exact key text, first match wins.
    ///
    /// ```
    /// use retree::v1::*;
    ///
    /// let docs = parse_yaml("application.yml", "spring:\n  profiles: dev\n").unwrap();
    /// let root = YamlMap::build(&docs.documents[0]);
    /// assert_eq!(root.get("spring").get("profiles").value().as_deref(), Some("dev"));
    /// assert_eq!(root.get("missing").get("anything").value(), None);
    /// ```
    pub fn get(&self, key: &str) -> YamlMap {
        let Some(view) = self.unwrap_document() else {
            return YamlMap::empty();
        };
        let Some(Yaml::Mapping(mapping)) = view.yaml() else {
            return YamlMap::empty();
        };
        match mapping.get(key) {
            Some(entry) => {
                let entry_view = view.child(Yaml::MappingEntry(Rc::clone(entry)));
                let value = Yaml::from(entry.value.clone());
                entry_view.child(value)
            }
            None => YamlMap::empty(),
        }
    }

    /// Follow a dotted path such as `spring.application.name`, one key per
    /// segment.
    pub fn get_path(&self, path: &str) -> YamlMap {
        path.split('.')
            .fold(self.clone(), |view, key| view.get(key))
    }

    /// The raw text of the backing scalar. No type coercion is applied.
    pub fn value(&self) -> Option<String> {
        match &*self.0.yaml.borrow() {
            Some(Yaml::Scalar(s)) => Some(s.value.clone()),
            _ => None,
        }
    }

    /// Replace the backing scalar's text and rebuild every ancestor up to the
    /// root. Does nothing when the view is not over a scalar.
    pub fn set_value(&self, value: impl ToString) -> &Self {
        let scalar = match &*self.0.yaml.borrow() {
            Some(Yaml::Scalar(s)) => Rc::clone(s),
            _ => return self,
        };
        self.update(Yaml::Scalar(scalar.with_value(value.to_string())));
        self
    }

    /// Point this view at `after` and substitute it for the node it replaces
    /// in the parent, recursively up to the root.
    fn update(&self, after: Yaml) {
        let before = self.0.yaml.replace(Some(after.clone()));
        let (Some(parent), Some(before)) = (&self.0.parent, before) else {
            return;
        };
        if let Some(parent_yaml) = parent.yaml() {
            parent.update(substitute(&parent_yaml, &before, &after));
        }
    }

    /// Nested mappings under this view, keyed by their entry's key text.
    /// Entries whose value is a scalar or a sequence are skipped.
    pub fn entries(&self) -> Vec<(String, YamlMap)> {
        let Some(view) = self.unwrap_document() else {
            return Vec::new();
        };
        let Some(Yaml::Mapping(mapping)) = view.yaml() else {
            return Vec::new();
        };
        mapping
            .entries
            .iter()
            .filter(|entry| matches!(entry.value, Block::Mapping(_)))
            .map(|entry| {
                let entry_view = view.child(Yaml::MappingEntry(Rc::clone(entry)));
                let value = entry_view.child(Yaml::from(entry.value.clone()));
                (entry.key_text().to_string(), value)
            })
            .collect()
    }

    /// The number of nested mappings, as counted by [`YamlMap::entries`].
    pub fn len(&self) -> usize {
        self.mapping()
            .map(|m| {
                m.entries
                    .iter()
                    .filter(|e| matches!(e.value, Block::Mapping(_)))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merging new keys into a mapping has no defined semantics yet: this
    /// fails with [`Error::NotAMapping`] when the view's own node is not a
    /// mapping (a root view built from a document included) and with
    /// [`Error::InsertUnsupported`] otherwise.
    pub fn insert(&self, _values: &BTreeMap<String, String>) -> Result<&Self> {
        match self.yaml() {
            Some(Yaml::Mapping(_)) => Err(Error::InsertUnsupported),
            Some(other) => Err(Error::NotAMapping(other.kind())),
            None => Err(Error::NotAMapping("nothing")),
        }
    }

    /// The dotted key path from the root view to this one, e.g.
    /// `spring.application.name`. Empty at the root and for the "not found"
    /// view.
    pub fn property_path(&self) -> String {
        let mut keys = Vec::new();
        let mut current = Some(self.clone());
        while let Some(view) = current {
            if let Some(Yaml::MappingEntry(entry)) = view.yaml() {
                keys.push(entry.key_text().to_string());
            }
            current = view.0.parent.clone();
        }
        keys.reverse();
        keys.join(".")
    }
}

impl fmt::Debug for YamlMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlMap")
            .field("path", &self.property_path())
            .field("kind", &self.yaml().map(|y| y.kind()))
            .field("value", &self.value())
            .finish()
    }
}

//! Visitors that mark configuration values by property key.

use crate::relaxed::KeyMatcher;
use retree::v1::visit::{walk_mapping_entry, walk_sequence_entry};
use retree::v1::*;
use std::rc::Rc;
use tracing::debug;

/// Marks YAML scalar values whose dotted key path matches.
///
/// The key path joins the mapping keys from the document root with `.`, so
/// `spring: {application: {name: x}}` and `spring.application.name: x` both
/// have the path `spring.application.name`. Sequences do not add to the path;
/// every scalar item of a matching sequence is marked.
pub struct FindYamlProperty {
    matcher: KeyMatcher,
    keys: Vec<String>,
}

impl FindYamlProperty {
    pub fn new(property_key: &str, relaxed_binding: bool) -> Self {
        Self {
            matcher: KeyMatcher::new(property_key, relaxed_binding),
            keys: Vec::new(),
        }
    }

    fn at_match(&self) -> bool {
        !self.keys.is_empty() && self.matcher.matches(&self.keys.join("."))
    }
}

fn mark(scalar: &Rc<Scalar>) -> Block {
    Block::Scalar(scalar.with_search_result(SearchResult::new()))
}

impl YamlVisitor for FindYamlProperty {
    fn visit_mapping_entry(&mut self, entry: &Rc<MappingEntry>) -> Rc<MappingEntry> {
        self.keys.push(entry.key_text().to_string());
        let after = match &entry.value {
            Block::Scalar(scalar) if self.at_match() => entry.with_value(mark(scalar)),
            _ => walk_mapping_entry(self, entry),
        };
        self.keys.pop();
        after
    }

    fn visit_sequence_entry(&mut self, entry: &Rc<SequenceEntry>) -> Rc<SequenceEntry> {
        match &entry.block {
            Block::Scalar(scalar) if self.at_match() => entry.with_block(mark(scalar)),
            _ => walk_sequence_entry(self, entry),
        }
    }
}

impl TreeVisitor for FindYamlProperty {
    fn visit(&mut self, source: &SourceFile, _ctx: &mut ExecutionContext) -> SourceFile {
        match source {
            SourceFile::Yaml(docs) => {
                let after = self.visit_documents(docs);
                if Rc::ptr_eq(&after, docs) {
                    source.clone()
                } else {
                    debug!("Found property in {}", docs.source_path.display());
                    SourceFile::Yaml(after)
                }
            }
            other => other.clone(),
        }
    }
}

/// Marks `.properties` values whose key matches.
pub struct FindProperties {
    matcher: KeyMatcher,
}

impl FindProperties {
    pub fn new(property_key: &str, relaxed_binding: bool) -> Self {
        Self {
            matcher: KeyMatcher::new(property_key, relaxed_binding),
        }
    }
}

impl PropertiesVisitor for FindProperties {
    fn visit_entry(&mut self, entry: &Rc<PropertyEntry>) -> Rc<PropertyEntry> {
        if self.matcher.matches(&entry.key_text()) {
            entry.with_value(entry.value.with_search_result(SearchResult::new()))
        } else {
            Rc::clone(entry)
        }
    }
}

impl TreeVisitor for FindProperties {
    fn visit(&mut self, source: &SourceFile, _ctx: &mut ExecutionContext) -> SourceFile {
        match source {
            SourceFile::Properties(file) => {
                let after = self.visit_file(file);
                if Rc::ptr_eq(&after, file) {
                    source.clone()
                } else {
                    debug!("Found property in {}", file.source_path.display());
                    SourceFile::Properties(after)
                }
            }
            other => other.clone(),
        }
    }
}

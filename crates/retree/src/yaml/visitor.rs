//! Rewriting traversal over YAML trees.
//!
//! A visitor returns the (possibly new) node for every node it is handed.
//! The `walk_*` functions visit children through [`YamlVisitor::visit`] and
//! rebuild the parent only when some child came back as a different node, so
//! untouched subtrees keep their identity.
//!
//! A visitor that returns a node of the wrong kind for a slot (say, a mapping
//! entry where a block is expected) leaves that slot unchanged.

use super::tree::{Block, Document, Documents, Mapping, MappingEntry, Scalar, Sequence, SequenceEntry, Yaml};
use std::rc::Rc;

pub trait YamlVisitor {
    /// Entry point for every node. Override to intercept traversal; call
    /// [`walk`] to continue into the node's children.
    fn visit(&mut self, tree: &Yaml) -> Yaml {
        walk(self, tree)
    }

    fn visit_documents(&mut self, docs: &Rc<Documents>) -> Rc<Documents> {
        walk_documents(self, docs)
    }

    fn visit_document(&mut self, doc: &Rc<Document>) -> Rc<Document> {
        walk_document(self, doc)
    }

    fn visit_mapping(&mut self, mapping: &Rc<Mapping>) -> Rc<Mapping> {
        walk_mapping(self, mapping)
    }

    fn visit_mapping_entry(&mut self, entry: &Rc<MappingEntry>) -> Rc<MappingEntry> {
        walk_mapping_entry(self, entry)
    }

    fn visit_sequence(&mut self, sequence: &Rc<Sequence>) -> Rc<Sequence> {
        walk_sequence(self, sequence)
    }

    fn visit_sequence_entry(&mut self, entry: &Rc<SequenceEntry>) -> Rc<SequenceEntry> {
        walk_sequence_entry(self, entry)
    }

    fn visit_scalar(&mut self, scalar: &Rc<Scalar>) -> Rc<Scalar> {
        Rc::clone(scalar)
    }
}

/// Dispatch `tree` to the matching typed hook.
pub fn walk<V: YamlVisitor + ?Sized>(v: &mut V, tree: &Yaml) -> Yaml {
    match tree {
        Yaml::Document(d) => Yaml::Document(v.visit_document(d)),
        Yaml::Mapping(m) => Yaml::Mapping(v.visit_mapping(m)),
        Yaml::MappingEntry(e) => Yaml::MappingEntry(v.visit_mapping_entry(e)),
        Yaml::Sequence(s) => Yaml::Sequence(v.visit_sequence(s)),
        Yaml::SequenceEntry(e) => Yaml::SequenceEntry(v.visit_sequence_entry(e)),
        Yaml::Scalar(s) => Yaml::Scalar(v.visit_scalar(s)),
    }
}

pub fn walk_documents<V: YamlVisitor + ?Sized>(v: &mut V, docs: &Rc<Documents>) -> Rc<Documents> {
    let mut changed = false;
    let documents: Vec<Rc<Document>> = docs
        .documents
        .iter()
        .map(|doc| {
            let after = v
                .visit(&Yaml::Document(Rc::clone(doc)))
                .into_document()
                .unwrap_or_else(|| Rc::clone(doc));
            changed |= !Rc::ptr_eq(doc, &after);
            after
        })
        .collect();
    if changed {
        Rc::new(docs.with_documents(documents))
    } else {
        Rc::clone(docs)
    }
}

pub fn walk_document<V: YamlVisitor + ?Sized>(v: &mut V, doc: &Rc<Document>) -> Rc<Document> {
    let block = visit_block(v, &doc.block);
    doc.with_block(block)
}

pub fn walk_mapping<V: YamlVisitor + ?Sized>(v: &mut V, mapping: &Rc<Mapping>) -> Rc<Mapping> {
    let mut changed = false;
    let entries: Vec<Rc<MappingEntry>> = mapping
        .entries
        .iter()
        .map(|entry| {
            let after = v
                .visit(&Yaml::MappingEntry(Rc::clone(entry)))
                .into_mapping_entry()
                .unwrap_or_else(|| Rc::clone(entry));
            changed |= !Rc::ptr_eq(entry, &after);
            after
        })
        .collect();
    if changed {
        mapping.with_entries(entries)
    } else {
        Rc::clone(mapping)
    }
}

pub fn walk_mapping_entry<V: YamlVisitor + ?Sized>(
    v: &mut V,
    entry: &Rc<MappingEntry>,
) -> Rc<MappingEntry> {
    let key = v
        .visit(&Yaml::Scalar(Rc::clone(&entry.key)))
        .into_scalar()
        .unwrap_or_else(|| Rc::clone(&entry.key));
    let value = visit_block(v, &entry.value);
    if Rc::ptr_eq(&key, &entry.key) {
        return entry.with_value(value);
    }
    Rc::new(MappingEntry {
        key,
        value,
        ..(**entry).clone()
    })
}

pub fn walk_sequence<V: YamlVisitor + ?Sized>(v: &mut V, sequence: &Rc<Sequence>) -> Rc<Sequence> {
    let mut changed = false;
    let entries: Vec<Rc<SequenceEntry>> = sequence
        .entries
        .iter()
        .map(|entry| {
            let after = v
                .visit(&Yaml::SequenceEntry(Rc::clone(entry)))
                .into_sequence_entry()
                .unwrap_or_else(|| Rc::clone(entry));
            changed |= !Rc::ptr_eq(entry, &after);
            after
        })
        .collect();
    if changed {
        sequence.with_entries(entries)
    } else {
        Rc::clone(sequence)
    }
}

pub fn walk_sequence_entry<V: YamlVisitor + ?Sized>(
    v: &mut V,
    entry: &Rc<SequenceEntry>,
) -> Rc<SequenceEntry> {
    let block = visit_block(v, &entry.block);
    entry.with_block(block)
}

fn visit_block<V: YamlVisitor + ?Sized>(v: &mut V, block: &Block) -> Block {
    v.visit(&Yaml::from(block.clone()))
        .into_block()
        .unwrap_or_else(|| block.clone())
}

/// Replace the direct child `before` of `parent` with `after`.
///
/// Children are matched by identity, so a sibling with the same text as
/// `before` is never touched. Only the immediate children of `parent` are
/// examined; everything else is returned as-is.
pub fn substitute(parent: &Yaml, before: &Yaml, after: &Yaml) -> Yaml {
    Substitute {
        parent,
        before,
        after,
    }
    .visit(parent)
}

struct Substitute<'a> {
    parent: &'a Yaml,
    before: &'a Yaml,
    after: &'a Yaml,
}

impl YamlVisitor for Substitute<'_> {
    fn visit(&mut self, tree: &Yaml) -> Yaml {
        if tree.ptr_eq(self.parent) {
            walk(self, tree)
        } else if tree.ptr_eq(self.before) {
            self.after.clone()
        } else {
            tree.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parser::parse;

    struct Upcase;

    impl YamlVisitor for Upcase {
        fn visit_scalar(&mut self, scalar: &Rc<Scalar>) -> Rc<Scalar> {
            scalar.with_value(scalar.value.to_uppercase())
        }
    }

    struct Noop;

    impl YamlVisitor for Noop {}

    #[test]
    fn test_noop_visitor_preserves_identity() {
        let docs = Rc::new(parse("a.yml", "a:\n  b: c\nd: [e, f]\n").unwrap());
        let after = Noop.visit_documents(&docs);
        assert!(Rc::ptr_eq(&docs, &after));
    }

    #[test]
    fn test_rewriting_visitor_rebuilds_spine() {
        let docs = Rc::new(parse("a.yml", "a:\n  b: c\nlist: [x]\n").unwrap());
        let after = Upcase.visit_documents(&docs);
        assert!(!Rc::ptr_eq(&docs, &after));
        assert_eq!(after.print(), "A:\n  B: C\nLIST: [X]\n");
        // the original tree is untouched
        assert_eq!(docs.print(), "a:\n  b: c\nlist: [x]\n");
    }

    #[test]
    fn test_substitute_matches_by_identity() {
        let docs = parse("a.yml", "a: same\nb: same\n").unwrap();
        let mapping = docs.documents[0].block.as_mapping().unwrap().clone();
        let first = mapping.entries[0].clone();
        let second = mapping.entries[1].clone();

        let first_value = first.value.as_scalar().unwrap().clone();
        let replaced = first.with_value(Block::Scalar(first_value.with_value("other")));

        let after = substitute(
            &Yaml::Mapping(mapping.clone()),
            &Yaml::MappingEntry(first.clone()),
            &Yaml::MappingEntry(replaced.clone()),
        );
        let after = match after {
            Yaml::Mapping(m) => m,
            other => panic!("Expected mapping, got {}", other.kind()),
        };
        assert!(Rc::ptr_eq(&after.entries[0], &replaced));
        assert!(Rc::ptr_eq(&after.entries[1], &second));
    }

    #[test]
    fn test_substitute_missing_child_keeps_parent() {
        let docs = parse("a.yml", "a: 1\n").unwrap();
        let mapping = docs.documents[0].block.as_mapping().unwrap().clone();
        let stranger = Yaml::Scalar(Rc::new(Scalar::plain("", "x")));
        let after = substitute(&Yaml::Mapping(mapping.clone()), &stranger, &stranger);
        assert!(after.ptr_eq(&Yaml::Mapping(mapping)));
    }
}

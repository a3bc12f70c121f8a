use super::tree::{
    Block, CollectionStyle, Document, Documents, Mapping, MappingEntry, Scalar, ScalarStyle,
    Sequence, SequenceEntry,
};
use crate::markers::SearchResult;

pub fn print_documents(docs: &Documents) -> String {
    let mut printer = YamlPrinter::default();
    for doc in &docs.documents {
        printer.document(doc);
    }
    printer.out.push_str(&docs.suffix);
    printer.out
}

/// Print a single block, e.g. for showing a matched value.
pub fn print_block(block: &Block) -> String {
    let mut printer = YamlPrinter::default();
    printer.block(block);
    printer.out
}

/// The 1-based line of every scalar carrying a [`SearchResult`], in document
/// order.
pub fn marked_lines(docs: &Documents) -> Vec<usize> {
    let mut printer = YamlPrinter::default();
    for doc in &docs.documents {
        printer.document(doc);
    }
    printer.marks
}

#[derive(Default)]
struct YamlPrinter {
    out: String,
    marks: Vec<usize>,
}

impl YamlPrinter {
    fn document(&mut self, doc: &Document) {
        self.out.push_str(&doc.prefix);
        if doc.explicit {
            self.out.push_str("---");
        }
        self.block(&doc.block);
        self.out.push_str(&doc.end.prefix);
        if doc.end.explicit {
            self.out.push_str("...");
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Mapping(m) => self.mapping(m),
            Block::Sequence(s) => self.sequence(s),
            Block::Scalar(s) => self.scalar(s),
        }
    }

    fn mapping(&mut self, mapping: &Mapping) {
        match &mapping.style {
            CollectionStyle::Block => {
                for entry in &mapping.entries {
                    self.mapping_entry(entry);
                }
            }
            CollectionStyle::Flow {
                opening_prefix,
                closing_prefix,
            } => {
                self.out.push_str(opening_prefix);
                self.out.push('{');
                for entry in &mapping.entries {
                    self.mapping_entry(entry);
                }
                self.out.push_str(closing_prefix);
                self.out.push('}');
            }
        }
    }

    fn mapping_entry(&mut self, entry: &MappingEntry) {
        self.out.push_str(&entry.prefix);
        self.scalar(&entry.key);
        self.out.push_str(&entry.before_colon);
        self.out.push(':');
        self.block(&entry.value);
        self.trailing_comma(entry.trailing_comma.as_deref());
    }

    fn sequence(&mut self, sequence: &Sequence) {
        match &sequence.style {
            CollectionStyle::Block => {
                for entry in &sequence.entries {
                    self.sequence_entry(entry);
                }
            }
            CollectionStyle::Flow {
                opening_prefix,
                closing_prefix,
            } => {
                self.out.push_str(opening_prefix);
                self.out.push('[');
                for entry in &sequence.entries {
                    self.sequence_entry(entry);
                }
                self.out.push_str(closing_prefix);
                self.out.push(']');
            }
        }
    }

    fn sequence_entry(&mut self, entry: &SequenceEntry) {
        self.out.push_str(&entry.prefix);
        if entry.dash {
            self.out.push('-');
        }
        self.block(&entry.block);
        self.trailing_comma(entry.trailing_comma.as_deref());
    }

    fn trailing_comma(&mut self, ws: Option<&str>) {
        if let Some(ws) = ws {
            self.out.push_str(ws);
            self.out.push(',');
        }
    }

    fn scalar(&mut self, scalar: &Scalar) {
        self.out.push_str(&scalar.prefix);
        if let Some(result) = scalar.markers.find_first::<SearchResult>() {
            self.marks.push(self.out.matches('\n').count() + 1);
            self.out.push_str(&result.render());
        }
        match scalar.style {
            ScalarStyle::Plain => self.out.push_str(&scalar.value),
            ScalarStyle::SingleQuoted => {
                self.out.push('\'');
                self.out.push_str(&scalar.value);
                self.out.push('\'');
            }
            ScalarStyle::DoubleQuoted => {
                self.out.push('"');
                self.out.push_str(&scalar.value);
                self.out.push('"');
            }
            ScalarStyle::Literal => {
                self.out.push('|');
                self.out.push_str(&scalar.value);
            }
            ScalarStyle::Folded => {
                self.out.push('>');
                self.out.push_str(&scalar.value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::Markers;
    use std::rc::Rc;

    #[test]
    fn test_search_result_printed_after_prefix() {
        let scalar = Rc::new(Scalar::plain(" ", "test"));
        let marked = scalar.with_search_result(SearchResult::new());
        assert_eq!(print_block(&Block::Scalar(marked)), " ~~>test");
    }

    #[test]
    fn test_search_result_with_description() {
        let scalar = Rc::new(Scalar {
            prefix: " ".into(),
            style: ScalarStyle::SingleQuoted,
            value: "v".into(),
            markers: Markers::new(),
        });
        let marked = scalar.with_search_result(SearchResult::with_description("found"));
        assert_eq!(print_block(&Block::Scalar(marked)), " ~~(found)~~>'v'");
    }

    #[test]
    fn test_marked_lines() {
        let docs = crate::yaml::parser::parse("a.yml", "a: 1
b:
  c: 2
").unwrap();
        let mapping = docs.documents[0].block.as_mapping().unwrap().clone();
        let b = mapping.get("b").unwrap().clone();
        let inner = b.value.as_mapping().unwrap().clone();
        let c = inner.entries[0].clone();
        let marked_c = c.with_value(Block::Scalar(
            c.value.as_scalar().unwrap().with_search_result(SearchResult::new()),
        ));
        let marked_b = b.with_value(Block::Mapping(inner.with_entries(vec![marked_c])));
        let marked_root = mapping.with_entries(vec![mapping.entries[0].clone(), marked_b]);
        let doc = docs.documents[0].with_block(Block::Mapping(marked_root));
        let marked = docs.with_documents(vec![doc]);
        assert_eq!(marked.print(), "a: 1\nb:\n  c: ~~>2\n");
        assert_eq!(marked_lines(&marked), vec![3]);
    }
}

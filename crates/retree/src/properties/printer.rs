use super::tree::{PropertiesContent, PropertiesFile, PropertyValue};
use crate::markers::SearchResult;

pub fn print_file(file: &PropertiesFile) -> String {
    let mut printer = PropertiesPrinter::default();
    printer.file(file);
    printer.out
}

/// The 1-based line of every value carrying a [`SearchResult`], in document
/// order.
pub fn marked_lines(file: &PropertiesFile) -> Vec<usize> {
    let mut printer = PropertiesPrinter::default();
    printer.file(file);
    printer.marks
}

#[derive(Default)]
struct PropertiesPrinter {
    out: String,
    marks: Vec<usize>,
}

impl PropertiesPrinter {
    fn file(&mut self, file: &PropertiesFile) {
        for content in &file.content {
            match content {
                PropertiesContent::Entry(entry) => {
                    self.out.push_str(&entry.prefix);
                    self.out.push_str(&entry.key);
                    self.out.push_str(&entry.before_delimiter);
                    self.out.push_str(entry.delimiter.as_str());
                    self.value(&entry.value);
                }
                PropertiesContent::Comment(comment) => {
                    self.out.push_str(&comment.prefix);
                    self.out.push(comment.delimiter);
                    self.out.push_str(&comment.message);
                }
            }
        }
        self.out.push_str(&file.eof);
    }

    fn value(&mut self, value: &PropertyValue) {
        self.out.push_str(&value.prefix);
        if let Some(result) = value.markers.find_first::<SearchResult>() {
            self.marks.push(self.out.matches('\n').count() + 1);
            self.out.push_str(&result.render());
        }
        self.out.push_str(&value.text);
    }
}

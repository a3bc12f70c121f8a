//! Rewriting traversal over properties files, following the same rules as the
//! YAML visitor: a parent is rebuilt only when a child changed identity.

use super::tree::{Comment, PropertiesContent, PropertiesFile, PropertyEntry, PropertyValue};
use std::rc::Rc;

pub trait PropertiesVisitor {
    fn visit_file(&mut self, file: &Rc<PropertiesFile>) -> Rc<PropertiesFile> {
        walk_file(self, file)
    }

    fn visit_entry(&mut self, entry: &Rc<PropertyEntry>) -> Rc<PropertyEntry> {
        walk_entry(self, entry)
    }

    fn visit_value(&mut self, value: &Rc<PropertyValue>) -> Rc<PropertyValue> {
        Rc::clone(value)
    }

    fn visit_comment(&mut self, comment: &Rc<Comment>) -> Rc<Comment> {
        Rc::clone(comment)
    }
}

pub fn walk_file<V: PropertiesVisitor + ?Sized>(
    v: &mut V,
    file: &Rc<PropertiesFile>,
) -> Rc<PropertiesFile> {
    let mut changed = false;
    let content: Vec<PropertiesContent> = file
        .content
        .iter()
        .map(|c| {
            let after = match c {
                PropertiesContent::Entry(e) => PropertiesContent::Entry(v.visit_entry(e)),
                PropertiesContent::Comment(cm) => PropertiesContent::Comment(v.visit_comment(cm)),
            };
            changed |= !after.ptr_eq(c);
            after
        })
        .collect();
    if changed {
        Rc::new(file.with_content(content))
    } else {
        Rc::clone(file)
    }
}

pub fn walk_entry<V: PropertiesVisitor + ?Sized>(
    v: &mut V,
    entry: &Rc<PropertyEntry>,
) -> Rc<PropertyEntry> {
    let value = v.visit_value(&entry.value);
    entry.with_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::parser::parse;

    struct Rename<'a> {
        key: &'a str,
        value: &'a str,
    }

    impl PropertiesVisitor for Rename<'_> {
        fn visit_entry(&mut self, entry: &Rc<PropertyEntry>) -> Rc<PropertyEntry> {
            if entry.key_text() == self.key {
                entry.with_value(entry.value.with_text(self.value))
            } else {
                walk_entry(self, entry)
            }
        }
    }

    #[test]
    fn test_untouched_file_keeps_identity() {
        let file = Rc::new(parse("a.properties", "a=1\n").unwrap());
        let mut v = Rename {
            key: "missing",
            value: "x",
        };
        assert!(Rc::ptr_eq(&file, &v.visit_file(&file)));
    }

    #[test]
    fn test_edit_single_value() {
        let file = Rc::new(parse("a.properties", "# head\na=1\nb = 2\n").unwrap());
        let mut v = Rename {
            key: "b",
            value: "3",
        };
        let after = v.visit_file(&file);
        assert_eq!(after.print(), "# head\na=1\nb = 3\n");
        assert!(after.content[0].ptr_eq(&file.content[0]));
        assert!(after.content[1].ptr_eq(&file.content[1]));
    }
}

//! Collect the search hits a recipe left in a source file.

use crate::markers::SearchResult;
use crate::source::SourceFile;
use crate::yaml::tree::{MappingEntry, Scalar};
use crate::yaml::visitor::{YamlVisitor, walk_mapping_entry};
use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;

/// A value marked with a [`SearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub source_path: PathBuf,
    /// Dotted key path of the matched value.
    pub property: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 1-based line of the value in the printed source.
    pub line: usize,
}

/// Every marked value in `source`, in document order.
pub fn find_search_results(source: &SourceFile) -> Vec<SearchMatch> {
    let (hits, lines) = match source {
        SourceFile::Yaml(docs) => {
            let mut collector = Collector::default();
            collector.visit_documents(docs);
            (collector.hits, crate::yaml::printer::marked_lines(docs))
        }
        SourceFile::Properties(file) => {
            let hits = file
                .entries()
                .filter_map(|entry| {
                    entry
                        .value
                        .markers
                        .find_first::<SearchResult>()
                        .map(|result| Hit {
                            property: entry.key_text(),
                            value: entry.value.value(),
                            description: result.description.clone(),
                        })
                })
                .collect();
            (hits, crate::properties::printer::marked_lines(file))
        }
        SourceFile::Text(_) => return Vec::new(),
    };

    hits.into_iter()
        .zip(lines)
        .map(|(hit, line)| SearchMatch {
            source_path: source.source_path().to_path_buf(),
            property: hit.property,
            value: hit.value,
            description: hit.description,
            line,
        })
        .collect()
}

struct Hit {
    property: String,
    value: String,
    description: Option<String>,
}

#[derive(Default)]
struct Collector {
    keys: Vec<String>,
    hits: Vec<Hit>,
}

impl YamlVisitor for Collector {
    fn visit_mapping_entry(&mut self, entry: &Rc<MappingEntry>) -> Rc<MappingEntry> {
        self.keys.push(entry.key_text().to_string());
        let after = walk_mapping_entry(self, entry);
        self.keys.pop();
        after
    }

    fn visit_scalar(&mut self, scalar: &Rc<Scalar>) -> Rc<Scalar> {
        if let Some(result) = scalar.markers.find_first::<SearchResult>() {
            self.hits.push(Hit {
                property: self.keys.join("."),
                value: scalar.value.clone(),
                description: result.description.clone(),
            });
        }
        Rc::clone(scalar)
    }
}

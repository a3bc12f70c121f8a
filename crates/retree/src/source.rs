use crate::error::Result;
use crate::markers::{Markers, SourceSet};
use crate::properties::tree::PropertiesFile;
use crate::yaml::tree::Documents;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A file that recipes can read and rewrite.
///
/// The variant is chosen from the file extension when parsing: `.yml` and
/// `.yaml` become [`SourceFile::Yaml`], `.properties` becomes
/// [`SourceFile::Properties`], and everything else is kept as
/// [`SourceFile::Text`].
#[derive(Debug, Clone)]
pub enum SourceFile {
    Yaml(Rc<Documents>),
    Properties(Rc<PropertiesFile>),
    Text(Rc<PlainText>),
}

/// A file kept verbatim. Plain text sources exist to carry markers, such as
/// the dependency information attached to a build file.
#[derive(Debug, Clone)]
pub struct PlainText {
    pub source_path: PathBuf,
    pub markers: Markers,
    pub text: String,
}

impl SourceFile {
    /// Parse `text` according to the extension of `path`. A [`SourceSet`]
    /// marker is attached when the path lies under `src/<name>/`.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<SourceFile> {
        let path = path.into();
        let source = match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => {
                SourceFile::Yaml(Rc::new(crate::yaml::parser::parse(path.clone(), text)?))
            }
            Some("properties") => SourceFile::Properties(Rc::new(
                crate::properties::parser::parse(path.clone(), text)?,
            )),
            _ => SourceFile::text(path.clone(), text),
        };
        Ok(match SourceSet::from_path(&path) {
            Some(set) => {
                let markers = source.markers().with(set);
                source.with_markers(markers)
            }
            None => source,
        })
    }

    pub fn text(path: impl Into<PathBuf>, text: impl Into<String>) -> SourceFile {
        SourceFile::Text(Rc::new(PlainText {
            source_path: path.into(),
            markers: Markers::new(),
            text: text.into(),
        }))
    }

    pub fn source_path(&self) -> &Path {
        match self {
            SourceFile::Yaml(docs) => &docs.source_path,
            SourceFile::Properties(file) => &file.source_path,
            SourceFile::Text(text) => &text.source_path,
        }
    }

    pub fn markers(&self) -> &Markers {
        match self {
            SourceFile::Yaml(docs) => &docs.markers,
            SourceFile::Properties(file) => &file.markers,
            SourceFile::Text(text) => &text.markers,
        }
    }

    pub fn with_markers(&self, markers: Markers) -> SourceFile {
        match self {
            SourceFile::Yaml(docs) => SourceFile::Yaml(Rc::new(Documents {
                markers,
                ..(**docs).clone()
            })),
            SourceFile::Properties(file) => SourceFile::Properties(Rc::new(PropertiesFile {
                markers,
                ..(**file).clone()
            })),
            SourceFile::Text(text) => SourceFile::Text(Rc::new(PlainText {
                markers,
                ..(**text).clone()
            })),
        }
    }

    pub fn print(&self) -> String {
        match self {
            SourceFile::Yaml(docs) => docs.print(),
            SourceFile::Properties(file) => file.print(),
            SourceFile::Text(text) => text.text.clone(),
        }
    }

    /// Identity comparison; a recipe that leaves a source alone hands back the
    /// same node.
    pub fn ptr_eq(&self, other: &SourceFile) -> bool {
        match (self, other) {
            (SourceFile::Yaml(a), SourceFile::Yaml(b)) => Rc::ptr_eq(a, b),
            (SourceFile::Properties(a), SourceFile::Properties(b)) => Rc::ptr_eq(a, b),
            (SourceFile::Text(a), SourceFile::Text(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SourceFile::Yaml(_) => "yaml",
            SourceFile::Properties(_) => "properties",
            SourceFile::Text(_) => "text",
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dispatches_on_extension() {
        let yaml = SourceFile::parse("a.yml", "a: 1\n").unwrap();
        assert_eq!(yaml.kind(), "yaml");
        let yaml = SourceFile::parse("a.yaml", "a: 1\n").unwrap();
        assert_eq!(yaml.kind(), "yaml");
        let props = SourceFile::parse("a.properties", "a=1\n").unwrap();
        assert_eq!(props.kind(), "properties");
        let text = SourceFile::parse("README.md", "# hi\n").unwrap();
        assert_eq!(text.kind(), "text");
        assert_eq!(text.print(), "# hi\n");
    }

    #[test]
    fn test_parse_attaches_source_set() {
        let source =
            SourceFile::parse("src/main/resources/application.yml", "a: 1\n").unwrap();
        assert_eq!(
            source.markers().find_first::<SourceSet>().unwrap().name,
            "main"
        );
        let bare = SourceFile::parse("application.yml", "a: 1\n").unwrap();
        assert!(!bare.markers().has::<SourceSet>());
    }

    #[test]
    fn test_parse_error_carries_path() {
        let err = SourceFile::parse("bad.yml", "a: &anchor 1\n").unwrap_err();
        assert!(err.to_string().starts_with("bad.yml:1:"));
    }

    #[test]
    fn test_with_markers_changes_identity_not_text() {
        let source = SourceFile::parse("a.properties", "a=1\n").unwrap();
        let marked = source.with_markers(Markers::new().with(SourceSet::new("test")));
        assert!(!source.ptr_eq(&marked));
        assert_eq!(source.print(), marked.print());
        assert_eq!(marked.source_path(), Path::new("a.properties"));
    }
}

use anyhow::{Context, Result, bail};
use retree::v1::{Documents, YamlMap, parse_yaml, unified_diff};
use std::path::{Path, PathBuf};

pub fn run_get(input: PathBuf, path: String) -> Result<()> {
    let docs = read_yaml(&input)?;
    match get(&docs, &path) {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => bail!("No value at {} in {:?}", path, input),
    }
}

pub fn run_set(input: PathBuf, path: String, value: String, write: bool) -> Result<()> {
    let docs = read_yaml(&input)?;
    let Some(edited) = set(&docs, &path, &value) else {
        bail!("No value at {} in {:?}", path, input);
    };
    let before = docs.print();
    let after = edited.print();
    if write {
        std::fs::write(&input, &after).with_context(|| format!("Failed to write {:?}", input))?;
    } else {
        print!("{}", unified_diff(&input, &before, &after));
    }
    Ok(())
}

fn read_yaml(path: &Path) -> Result<Documents> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse_yaml(path, &content).with_context(|| format!("Failed to parse {:?}", path))
}

/// The scalar at a dotted path in the first document that has one.
fn get(docs: &Documents, path: &str) -> Option<String> {
    docs.documents
        .iter()
        .find_map(|doc| YamlMap::build(doc).get_path(path).value())
}

/// Set the scalar at a dotted path in every document that has one. `None`
/// when no document does.
fn set(docs: &Documents, path: &str, value: &str) -> Option<Documents> {
    let mut found = false;
    let documents = docs
        .documents
        .iter()
        .map(|doc| {
            let root = YamlMap::build(doc);
            let view = root.get_path(path);
            if view.value().is_some() {
                found = true;
                view.set_value(value);
            }
            root.document().unwrap_or_else(|| doc.clone())
        })
        .collect();
    found.then(|| docs.with_documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "spring:\n  application:\n    name: test # the name\n---\nserver:\n  port: 8080\n";

    fn docs() -> Documents {
        parse_yaml("application.yml", APP).unwrap()
    }

    #[test]
    fn test_get() {
        assert_eq!(get(&docs(), "spring.application.name").as_deref(), Some("test"));
        assert_eq!(get(&docs(), "server.port").as_deref(), Some("8080"));
        assert_eq!(get(&docs(), "spring.application"), None);
        assert_eq!(get(&docs(), "missing"), None);
    }

    #[test]
    fn test_set() {
        let edited = set(&docs(), "server.port", "9090").unwrap();
        assert_eq!(
            edited.print(),
            "spring:\n  application:\n    name: test # the name\n---\nserver:\n  port: 9090\n"
        );
        assert!(set(&docs(), "server.host", "x").is_none());
    }
}

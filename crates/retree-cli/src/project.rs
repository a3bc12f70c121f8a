//! Load the configuration and build files of a project into source files.

use anyhow::{Context, Result, bail};
use retree::v1::SourceFile;
use retree_maven::v1::parse_pom_source;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules"];

/// Every YAML, properties and `pom.xml` file below `root`, with paths relative
/// to `root`. Files that fail to parse are skipped with a warning.
pub fn load(root: &Path) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));
    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_loaded(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        match load_file(entry.path(), relative.clone()) {
            Ok(source) => {
                debug!("Loaded {} as {}", relative.display(), source.kind());
                sources.push(source);
            }
            Err(e) => warn!("Skipping {}: {:#}", relative.display(), e),
        }
    }
    Ok(sources)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_loaded(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == "pom.xml")
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "yml" | "yaml" | "properties"))
}

fn load_file(path: &Path, relative: PathBuf) -> Result<SourceFile> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    if path.file_name().is_some_and(|n| n == "pom.xml") {
        Ok(parse_pom_source(relative, &text)?)
    } else {
        Ok(SourceFile::parse(relative, &text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "pom.xml", "<project><artifactId>demo</artifactId></project>");
        write(root, "src/main/resources/application.yml", "a: 1\n");
        write(root, "src/main/resources/application.properties", "a=1\n");
        write(root, "src/main/java/App.java", "class App {}\n");
        write(root, "target/classes/application.yml", "a: 1\n");
        write(root, "node_modules/x/config.yml", "a: 1\n");

        let sources = load(root).unwrap();
        let paths: Vec<String> = sources
            .iter()
            .map(|s| s.source_path().display().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "pom.xml",
                "src/main/resources/application.properties",
                "src/main/resources/application.yml",
            ]
        );
        assert_eq!(sources[2].kind(), "yaml");
    }

    #[test]
    fn test_unparsable_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.yml", "a: &anchor 1\n");
        write(dir.path(), "pom.xml", "<project>");
        write(dir.path(), "good.yml", "a: 1\n");
        let sources = load(dir.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source_path(), Path::new("good.yml"));
    }

    #[test]
    fn test_root_must_be_a_directory() {
        assert!(load(Path::new("/definitely/not/here")).is_err());
    }
}

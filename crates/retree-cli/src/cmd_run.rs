use crate::output::{Report, to_json};
use crate::project;
use anyhow::{Context, Result};
use retree_spring::v1::RecipeConfig;
use std::path::{Path, PathBuf};

pub fn run(recipe: PathBuf, root: PathBuf, json: bool, pretty: bool) -> Result<()> {
    let config = read_recipe(&recipe)?;
    let sources = project::load(&root)?;
    let run = config
        .run(&sources)
        .with_context(|| format!("Failed to run {}", config.display_name()))?;

    if json {
        println!("{}", to_json(&Report::from_run(&run), pretty)?);
        return Ok(());
    }
    for result in &run.results {
        print!("{}", result.diff());
    }
    for warning in &run.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn read_recipe(path: &Path) -> Result<RecipeConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    RecipeConfig::from_json(&content).with_context(|| format!("Failed to parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_recipe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipe.json");
        std::fs::write(
            &path,
            r#"{"recipe": "FindSpringProperty", "propertyKey": "server.port"}"#,
        )
        .unwrap();
        let config = read_recipe(&path).unwrap();
        assert_eq!(config.display_name(), "Find Spring properties");

        std::fs::write(&path, "{}").unwrap();
        let err = read_recipe(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        assert!(read_recipe(&dir.path().join("missing.json")).is_err());
    }
}

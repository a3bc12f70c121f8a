use crate::output::{Report, to_json};
use crate::project;
use anyhow::{Context, Result};
use retree_spring::v1::{FindSpringProperty, FindSpringPropertyForVersions, RecipeConfig};
use std::path::PathBuf;

pub fn run(
    root: PathBuf,
    property: String,
    exact: bool,
    version_range: Option<String>,
    json: bool,
    pretty: bool,
) -> Result<()> {
    let config = recipe(property, exact, version_range);
    let sources = project::load(&root)?;
    let run = config
        .run(&sources)
        .with_context(|| format!("Failed to run {}", config.display_name()))?;
    let report = Report::from_run(&run);
    if json {
        println!("{}", to_json(&report, pretty)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn recipe(property: String, exact: bool, version_range: Option<String>) -> RecipeConfig {
    let relaxed_binding = exact.then_some(false);
    match version_range {
        Some(version_range) => FindSpringPropertyForVersions {
            version_range,
            property_key: property,
            relaxed_binding,
        }
        .into(),
        None => FindSpringProperty {
            property_key: property,
            relaxed_binding,
        }
        .into(),
    }
}

//! Recipe options as JSON, e.g.
//!
//! ```json
//! { "recipe": "FindSpringPropertyForVersions", "versionRange": "5.x", "propertyKey": "spring.application.name" }
//! ```

use crate::recipes::{FindSpringProperty, FindSpringPropertyForVersions};
use retree::v1::{Error, RecipeRun, Result, SourceFile, run, run_scanning};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recipe")]
pub enum RecipeConfig {
    FindSpringProperty(FindSpringProperty),
    FindSpringPropertyForVersions(FindSpringPropertyForVersions),
}

impl RecipeConfig {
    pub fn from_json(text: &str) -> Result<RecipeConfig> {
        serde_json::from_str(text).map_err(|e| Error::InvalidRecipe(e.to_string()))
    }

    pub fn display_name(&self) -> String {
        match self {
            RecipeConfig::FindSpringProperty(r) => retree::v1::Recipe::display_name(r),
            RecipeConfig::FindSpringPropertyForVersions(r) => {
                retree::v1::ScanningRecipe::display_name(r)
            }
        }
    }

    /// Validate the recipe and run it over `sources`.
    pub fn run(&self, sources: &[SourceFile]) -> Result<RecipeRun> {
        info!("Running {} over {} sources", self.display_name(), sources.len());
        match self {
            RecipeConfig::FindSpringProperty(r) => run(r, sources),
            RecipeConfig::FindSpringPropertyForVersions(r) => run_scanning(r, sources),
        }
    }
}

impl From<FindSpringProperty> for RecipeConfig {
    fn from(recipe: FindSpringProperty) -> Self {
        RecipeConfig::FindSpringProperty(recipe)
    }
}

impl From<FindSpringPropertyForVersions> for RecipeConfig {
    fn from(recipe: FindSpringPropertyForVersions) -> Self {
        RecipeConfig::FindSpringPropertyForVersions(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = RecipeConfig::from_json(
            r#"{"recipe": "FindSpringProperty", "propertyKey": "server.port", "relaxedBinding": false}"#,
        )
        .unwrap();
        let RecipeConfig::FindSpringProperty(recipe) = &config else {
            panic!("Expected FindSpringProperty");
        };
        assert_eq!(recipe.property_key, "server.port");
        assert!(!recipe.relaxed_binding());

        let config = RecipeConfig::from_json(
            r#"{"recipe": "FindSpringPropertyForVersions", "versionRange": "5.x", "propertyKey": "a"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            FindSpringPropertyForVersions::new("5.x", "a").into()
        );
    }

    #[test]
    fn test_unknown_recipe() {
        let err = RecipeConfig::from_json(r#"{"recipe": "Nope"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidRecipe(_)));
        assert!(RecipeConfig::from_json(r#"{"recipe": "FindSpringProperty"}"#).is_err());
    }

    #[test]
    fn test_serialize_omits_default_binding() {
        let config: RecipeConfig = FindSpringProperty::new("server.port").into();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"recipe":"FindSpringProperty","propertyKey":"server.port"}"#
        );
    }

    #[test]
    fn test_run() {
        let sources = vec![
            SourceFile::parse("src/main/resources/application.properties", "server.port=80\n")
                .unwrap(),
        ];
        let config: RecipeConfig = FindSpringProperty::new("server.port").into();
        let run = config.run(&sources).unwrap();
        assert_eq!(run.results[0].after.print(), "server.port=~~>80\n");
    }
}

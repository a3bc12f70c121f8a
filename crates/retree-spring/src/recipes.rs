//! Recipes that find Spring Boot properties in application configuration.

use crate::find_property::{FindProperties, FindYamlProperty};
use retree::v1::*;
use retree_maven::v1::{MavenResolutionResult, SPRING_FRAMEWORK_GROUP, Scope, VersionComparator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Spring Boot reads `application.yml`, `application-{profile}.properties`
/// and the like.
const APPLICATION_FILES: &str = "**/application*";

const MAIN_SOURCE_SET: &str = "main";

/// Find a Spring property in YAML or properties files of the main source set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSpringProperty {
    /// The property key to look for, e.g.
    /// `management.metrics.binders.files.enabled`. May contain `*` globs.
    pub property_key: String,
    /// Match the key with relaxed binding. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaxed_binding: Option<bool>,
}

impl FindSpringProperty {
    pub fn new(property_key: impl Into<String>) -> Self {
        Self {
            property_key: property_key.into(),
            relaxed_binding: None,
        }
    }

    pub fn relaxed_binding(&self) -> bool {
        self.relaxed_binding.unwrap_or(true)
    }
}

impl Recipe for FindSpringProperty {
    fn display_name(&self) -> String {
        "Find Spring properties".into()
    }

    fn description(&self) -> String {
        "Find Spring properties in YAML or properties files, and only in the main source set."
            .into()
    }

    fn validate(&self) -> Result<()> {
        validate_options(&self.property_key)
    }

    fn visitor(&self) -> Box<dyn TreeVisitor + '_> {
        in_main_application_config(FindSpringProperties::new(
            &self.property_key,
            self.relaxed_binding(),
        ))
    }
}

/// Like [`FindSpringProperty`], but only in projects whose runtime
/// `spring-core` version lies in `version_range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindSpringPropertyForVersions {
    /// A Spring Framework version selector such as `5.x` or `[5.3,6)`.
    pub version_range: String,
    pub property_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaxed_binding: Option<bool>,
}

impl FindSpringPropertyForVersions {
    pub fn new(version_range: impl Into<String>, property_key: impl Into<String>) -> Self {
        Self {
            version_range: version_range.into(),
            property_key: property_key.into(),
            relaxed_binding: None,
        }
    }

    pub fn relaxed_binding(&self) -> bool {
        self.relaxed_binding.unwrap_or(true)
    }
}

impl ScanningRecipe for FindSpringPropertyForVersions {
    /// Whether any build file puts a matching `spring-core` on the runtime
    /// classpath.
    type Accumulator = bool;

    fn display_name(&self) -> String {
        "Find Spring properties for Spring Framework versions".into()
    }

    fn description(&self) -> String {
        "Find Spring properties in YAML or properties files of the main source set, \
         in projects using a matching Spring Framework version."
            .into()
    }

    fn validate(&self) -> Result<()> {
        validate_options(&self.property_key)?;
        VersionComparator::validate(&self.version_range)
            .map_err(|e| Error::InvalidRecipe(e.to_string()))
    }

    fn initial_value(&self) -> bool {
        false
    }

    fn scan(&self, in_range: &mut bool, source: &SourceFile, ctx: &mut ExecutionContext) {
        let Some(resolution) = source.markers().find_first::<MavenResolutionResult>() else {
            return;
        };
        for warning in &resolution.warnings {
            ctx.warn(format!("{}: {}", source.source_path().display(), warning));
        }
        let Ok(comparator) = VersionComparator::parse(&self.version_range) else {
            return;
        };
        let matching = resolution
            .find_dependencies(SPRING_FRAMEWORK_GROUP, "spring-core", Scope::Runtime)
            .into_iter()
            .find(|dep| comparator.is_valid(None, &dep.version));
        if let Some(dep) = matching {
            debug!(
                "{} uses {} within {}",
                source.source_path().display(),
                dep,
                self.version_range
            );
            *in_range = true;
        }
    }

    fn visitor<'a>(&'a self, in_range: &'a bool) -> Box<dyn TreeVisitor + 'a> {
        Box::new(Check::new(
            *in_range,
            in_main_application_config(FindSpringProperties::new(
                &self.property_key,
                self.relaxed_binding(),
            )),
        ))
    }
}

fn validate_options(property_key: &str) -> Result<()> {
    if property_key.trim().is_empty() {
        return Err(Error::InvalidRecipe("propertyKey must not be empty".into()));
    }
    FindSourceFiles::new(APPLICATION_FILES)?;
    Ok(())
}

/// Restrict `visitor` to `application*` files of the main source set.
fn in_main_application_config<'a, V: TreeVisitor + 'a>(visitor: V) -> Box<dyn TreeVisitor + 'a> {
    match FindSourceFiles::new(APPLICATION_FILES) {
        Ok(files) => Box::new(Check::new(
            And(HasSourceSet::new(MAIN_SOURCE_SET), files),
            visitor,
        )),
        Err(e) => {
            warn!("Skipping every source: {}", e);
            Box::new(Check::new(false, visitor))
        }
    }
}

/// Runs the properties finder, then the YAML finder.
struct FindSpringProperties {
    properties: FindProperties,
    yaml: FindYamlProperty,
}

impl FindSpringProperties {
    fn new(property_key: &str, relaxed_binding: bool) -> Self {
        Self {
            properties: FindProperties::new(property_key, relaxed_binding),
            yaml: FindYamlProperty::new(property_key, relaxed_binding),
        }
    }
}

impl TreeVisitor for FindSpringProperties {
    fn visit(&mut self, source: &SourceFile, ctx: &mut ExecutionContext) -> SourceFile {
        let source = TreeVisitor::visit(&mut self.properties, source, ctx);
        TreeVisitor::visit(&mut self.yaml, &source, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retree_maven::v1::parse_pom_source;

    fn project_pom(version: &str) -> SourceFile {
        let xml = format!(
            r#"<project>
  <parent>
    <groupId>org.springframework.boot</groupId>
    <artifactId>spring-boot-starter-parent</artifactId>
    <version>{version}</version>
    <relativePath/> <!-- lookup parent from repository -->
  </parent>
  <groupId>com.example</groupId>
  <artifactId>demo</artifactId>
  <version>0.0.1-SNAPSHOT</version>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter</artifactId>
    </dependency>
  </dependencies>
</project>
"#
        );
        parse_pom_source("pom.xml", &xml).unwrap()
    }

    fn application_yml() -> SourceFile {
        SourceFile::parse(
            "src/main/resources/application.yml",
            "spring.application.name: test\n",
        )
        .unwrap()
    }

    #[test]
    fn test_find_spring_property() {
        let sources = vec![
            application_yml(),
            SourceFile::parse(
                "src/main/resources/application-dev.properties",
                "spring.application.name=dev\n",
            )
            .unwrap(),
        ];
        let run = run(&FindSpringProperty::new("spring.application.name"), &sources).unwrap();
        assert_eq!(run.results.len(), 2);
        assert_eq!(
            run.results[0].after.print(),
            "spring.application.name: ~~>test\n"
        );
        assert_eq!(
            run.results[1].after.print(),
            "spring.application.name=~~>dev\n"
        );
    }

    #[test]
    fn test_only_main_application_files() {
        let sources = vec![
            SourceFile::parse(
                "src/test/resources/application.yml",
                "spring.application.name: test\n",
            )
            .unwrap(),
            SourceFile::parse(
                "src/main/resources/bootstrap.yml",
                "spring.application.name: test\n",
            )
            .unwrap(),
            SourceFile::parse("application.yml", "spring.application.name: test\n").unwrap(),
            SourceFile::parse(
                "src/main/resources/application-config/other.yml",
                "spring.application.name: test\n",
            )
            .unwrap(),
        ];
        let run = run(&FindSpringProperty::new("spring.application.name"), &sources).unwrap();
        assert!(run.is_empty());
    }

    #[test]
    fn test_resolution_warnings_reach_the_run() {
        let recipe = FindSpringPropertyForVersions::new("5.x", "spring.application.name");
        let run = run_scanning(&recipe, &[application_yml(), project_pom("9.9.0")]).unwrap();
        assert!(run.results.is_empty());
        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].starts_with("pom.xml: "));
        assert!(run.warnings[0].contains("9.9.0"));
    }

    #[test]
    fn test_exact_binding() {
        let source = SourceFile::parse(
            "src/main/resources/application.yml",
            "spring:\n  application:\n    Name: test\n",
        )
        .unwrap();
        let relaxed = FindSpringProperty::new("spring.application.name");
        assert_eq!(run(&relaxed, &[source.clone()]).unwrap().results.len(), 1);

        let exact = FindSpringProperty {
            relaxed_binding: Some(false),
            ..relaxed
        };
        assert!(run(&exact, &[source]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_key_is_invalid() {
        let err = run(&FindSpringProperty::new(" "), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidRecipe(_)));
    }

    #[test]
    fn test_find_for_matching_versions() {
        let recipe = FindSpringPropertyForVersions::new("5.x", "spring.application.name");
        let sources = vec![application_yml(), project_pom("2.5.0")];
        let run = run_scanning(&recipe, &sources).unwrap();
        assert_eq!(run.results.len(), 1);
        assert_eq!(
            run.results[0].path(),
            std::path::Path::new("src/main/resources/application.yml")
        );
        assert_eq!(
            run.results[0].after.print(),
            "spring.application.name: ~~>test\n"
        );

        let hits = find_search_results(&run.results[0].after);
        assert_eq!(hits[0].property, "spring.application.name");
        assert_eq!(hits[0].line, 1);
    }

    #[test]
    fn test_no_match_on_spring_6() {
        let recipe = FindSpringPropertyForVersions::new("5.x", "spring.application.name");
        let sources = vec![application_yml(), project_pom("3.2.0")];
        assert!(run_scanning(&recipe, &sources).unwrap().is_empty());
    }

    #[test]
    fn test_no_build_file_no_match() {
        let recipe = FindSpringPropertyForVersions::new("5.x", "spring.application.name");
        assert!(run_scanning(&recipe, &[application_yml()]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_version_range() {
        let recipe = FindSpringPropertyForVersions::new("5.x.3", "spring.application.name");
        let err = run_scanning(&recipe, &[application_yml()]).unwrap_err();
        assert!(matches!(err, Error::InvalidRecipe(_)));
    }
}

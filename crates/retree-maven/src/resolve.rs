//! Offline dependency resolution for a single POM.
//!
//! There is no repository access: versions come from the POM itself, its
//! `<dependencyManagement>`, and the Spring Boot dependency management that a
//! `spring-boot-starter-parent` parent or an imported `spring-boot-dependencies`
//! BOM brings in. Spring Boot artifacts pull in `spring-core` and
//! `spring-context` at the Spring Framework version aligned with the Boot
//! line, and every other Spring Framework artifact pulls in `spring-core` at
//! its own version.

use crate::error::Result;
use crate::pom::{Dependency, Pom, Scope};
use crate::version::Version;
use globset::Glob;
use retree::v1::{Marker, Markers, SourceFile};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const SPRING_BOOT_GROUP: &str = "org.springframework.boot";
pub const SPRING_FRAMEWORK_GROUP: &str = "org.springframework";

/// The Spring Framework version shipped with the first release of each
/// Spring Boot line.
const BOOT_FRAMEWORK_ALIGNMENT: &[((u64, u64), &str)] = &[
    ((1, 5), "4.3.6.RELEASE"),
    ((2, 0), "5.0.4.RELEASE"),
    ((2, 1), "5.1.2.RELEASE"),
    ((2, 2), "5.2.1.RELEASE"),
    ((2, 3), "5.2.6.RELEASE"),
    ((2, 4), "5.3.1"),
    ((2, 5), "5.3.7"),
    ((2, 6), "5.3.13"),
    ((2, 7), "5.3.20"),
    ((3, 0), "6.0.2"),
    ((3, 1), "6.0.9"),
    ((3, 2), "6.1.1"),
    ((3, 3), "6.1.8"),
    ((3, 4), "6.2.0"),
];

/// The Spring Framework version managed by a Spring Boot version, if the Boot
/// line is known.
pub fn spring_framework_version(boot_version: &str) -> Option<&'static str> {
    let boot = Version::parse(boot_version).ok()?;
    BOOT_FRAMEWORK_ALIGNMENT
        .iter()
        .find(|((major, minor), _)| boot.major() == *major && boot.minor() == *minor)
        .map(|(_, framework)| *framework)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: Scope,
    /// 0 for dependencies declared in the POM, 1 for what they bring in.
    pub depth: usize,
}

impl ResolvedDependency {
    pub fn is_direct(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for ResolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} ({})",
            self.group_id, self.artifact_id, self.version, self.scope
        )
    }
}

/// The resolved dependencies of a POM. Attached as a marker to the POM's
/// source file so recipes can look up what a project depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenResolutionResult {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    /// The Spring Boot version managing this project's dependencies.
    pub spring_boot_version: Option<String>,
    pub dependencies: Vec<ResolvedDependency>,
    /// Problems met while resolving, such as dependencies left without a
    /// version. Each one was also logged.
    pub warnings: Vec<String>,
}

impl Marker for MavenResolutionResult {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MavenResolutionResult {
    /// Dependencies visible on the `scope` classpath whose group and artifact
    /// match. Both patterns accept `*` globs.
    ///
    /// ```
    /// use retree_maven::v1::*;
    ///
    /// let pom = Pom::parse(r#"<project>
    ///   <parent>
    ///     <groupId>org.springframework.boot</groupId>
    ///     <artifactId>spring-boot-starter-parent</artifactId>
    ///     <version>2.5.0</version>
    ///   </parent>
    ///   <artifactId>demo</artifactId>
    ///   <dependencies>
    ///     <dependency>
    ///       <groupId>org.springframework.boot</groupId>
    ///       <artifactId>spring-boot-starter</artifactId>
    ///     </dependency>
    ///   </dependencies>
    /// </project>"#).unwrap();
    ///
    /// let result = resolve(&pom);
    /// let core = result.find_dependencies("org.springframework", "spring-core", Scope::Runtime);
    /// assert_eq!(core[0].version, "5.3.7");
    /// ```
    pub fn find_dependencies(
        &self,
        group_pattern: &str,
        artifact_pattern: &str,
        scope: Scope,
    ) -> Vec<&ResolvedDependency> {
        let group = Pattern::new(group_pattern);
        let artifact = Pattern::new(artifact_pattern);
        self.dependencies
            .iter()
            .filter(|d| {
                group.matches(&d.group_id)
                    && artifact.matches(&d.artifact_id)
                    && d.scope.is_in_classpath_of(scope)
            })
            .collect()
    }
}

enum Pattern {
    Glob(globset::GlobMatcher),
    Literal(String),
}

impl Pattern {
    fn new(pattern: &str) -> Pattern {
        if pattern.contains(['*', '?']) {
            if let Ok(glob) = Glob::new(pattern) {
                return Pattern::Glob(glob.compile_matcher());
            }
        }
        Pattern::Literal(pattern.to_string())
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::Glob(m) => m.is_match(text),
            Pattern::Literal(s) => s == text,
        }
    }
}

/// Resolve the dependencies of `pom`.
pub fn resolve(pom: &Pom) -> MavenResolutionResult {
    let properties = effective_properties(pom);
    let expand = |s: &str| interpolate(s, &properties);
    let mut warnings = Vec::new();

    let spring_boot_version = boot_version(pom, &expand);
    let framework_version = spring_boot_version
        .as_deref()
        .and_then(spring_framework_version);
    if let (Some(boot), None) = (&spring_boot_version, framework_version) {
        report(
            &mut warnings,
            format!(
                "No Spring Framework alignment known for Spring Boot {}; framework artifacts stay unresolved",
                boot
            ),
        );
    }

    let mut managed: BTreeMap<(String, String), String> = BTreeMap::new();
    for dep in pom.dependency_management.iter().filter(|d| !d.is_bom_import()) {
        if let Some(version) = &dep.version {
            managed.insert(
                (expand(&dep.group_id), expand(&dep.artifact_id)),
                expand(version),
            );
        }
    }
    let managed_version = |group: &str, artifact: &str| -> Option<String> {
        if let Some(v) = managed.get(&(group.to_string(), artifact.to_string())) {
            return Some(v.clone());
        }
        match group {
            SPRING_BOOT_GROUP => spring_boot_version.clone(),
            SPRING_FRAMEWORK_GROUP => framework_version.map(str::to_string),
            _ => None,
        }
    };

    let mut dependencies: Vec<ResolvedDependency> = Vec::new();
    for dep in &pom.dependencies {
        match resolve_direct(dep, &expand, &managed_version, &mut warnings) {
            Some(resolved) => dependencies.push(resolved),
            None => report(
                &mut warnings,
                format!(
                    "Could not resolve a version for {}:{}",
                    dep.group_id, dep.artifact_id
                ),
            ),
        }
    }

    let mut transitive = Vec::new();
    for dep in &dependencies {
        for (group, artifact, version) in brought_in_by(dep, &managed_version) {
            transitive.push(ResolvedDependency {
                group_id: group.to_string(),
                artifact_id: artifact.to_string(),
                version,
                scope: dep.scope,
                depth: 1,
            });
        }
    }
    // nearest wins: a declared dependency shadows anything brought in, and
    // the first transitive occurrence shadows later ones
    for dep in transitive {
        let seen = dependencies.iter().any(|d| {
            d.group_id == dep.group_id && d.artifact_id == dep.artifact_id && d.scope == dep.scope
        });
        if !seen {
            dependencies.push(dep);
        }
    }

    debug!(
        "Resolved {} dependencies for {}",
        dependencies.len(),
        pom.artifact_id
    );
    MavenResolutionResult {
        group_id: pom.effective_group_id().map(&expand),
        artifact_id: expand(&pom.artifact_id),
        version: pom.effective_version().map(&expand),
        spring_boot_version,
        dependencies,
        warnings,
    }
}

fn report(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

fn resolve_direct(
    dep: &Dependency,
    expand: &impl Fn(&str) -> String,
    managed_version: &impl Fn(&str, &str) -> Option<String>,
    warnings: &mut Vec<String>,
) -> Option<ResolvedDependency> {
    let group_id = expand(&dep.group_id);
    let artifact_id = expand(&dep.artifact_id);
    let version = match &dep.version {
        Some(v) => expand(v),
        None => managed_version(&group_id, &artifact_id)?,
    };
    if version.contains("${") {
        return None;
    }
    let scope = match dep.scope.as_deref() {
        None => Scope::Compile,
        Some(s) => match s.parse() {
            Ok(scope) => scope,
            Err(_) => {
                report(
                    warnings,
                    format!(
                        "Unknown scope {:?} on {}:{}, using compile",
                        s, group_id, artifact_id
                    ),
                );
                Scope::Compile
            }
        },
    };
    Some(ResolvedDependency {
        group_id,
        artifact_id,
        version,
        scope,
        depth: 0,
    })
}

/// The Spring Framework artifacts `dep` brings in, with their versions.
fn brought_in_by(
    dep: &ResolvedDependency,
    managed_version: &impl Fn(&str, &str) -> Option<String>,
) -> Vec<(&'static str, &'static str, String)> {
    match dep.group_id.as_str() {
        SPRING_BOOT_GROUP if dep.artifact_id.starts_with("spring-boot") => {
            ["spring-core", "spring-context"]
                .into_iter()
                .filter_map(|artifact| {
                    managed_version(SPRING_FRAMEWORK_GROUP, artifact)
                        .or_else(|| spring_framework_version(&dep.version).map(str::to_string))
                        .map(|v| (SPRING_FRAMEWORK_GROUP, artifact, v))
                })
                .collect()
        }
        SPRING_FRAMEWORK_GROUP
            if dep.artifact_id != "spring-core" && dep.artifact_id != "spring-jcl" =>
        {
            vec![(SPRING_FRAMEWORK_GROUP, "spring-core", dep.version.clone())]
        }
        _ => Vec::new(),
    }
}

/// The Spring Boot version from a Boot parent or an imported Boot BOM.
fn boot_version(pom: &Pom, expand: &impl Fn(&str) -> String) -> Option<String> {
    let from_parent = pom.parent.as_ref().and_then(|p| {
        let boot_parent = p.group_id == SPRING_BOOT_GROUP
            && matches!(
                p.artifact_id.as_str(),
                "spring-boot-starter-parent" | "spring-boot-dependencies"
            );
        boot_parent.then(|| expand(&p.version))
    });
    from_parent.or_else(|| {
        pom.dependency_management
            .iter()
            .find(|d| {
                d.is_bom_import()
                    && expand(&d.group_id) == SPRING_BOOT_GROUP
                    && expand(&d.artifact_id) == "spring-boot-dependencies"
            })
            .and_then(|d| d.version.as_deref().map(expand))
    })
}

fn effective_properties(pom: &Pom) -> BTreeMap<String, String> {
    let mut properties = pom.properties.clone();
    let mut builtin = |key: &str, value: Option<&str>| {
        if let Some(value) = value {
            properties.insert(key.to_string(), value.to_string());
            properties.insert(format!("pom.{}", key.trim_start_matches("project.")), value.to_string());
        }
    };
    builtin("project.groupId", pom.effective_group_id());
    builtin("project.artifactId", Some(pom.artifact_id.as_str()));
    builtin("project.version", pom.effective_version());
    builtin(
        "project.parent.version",
        pom.parent.as_ref().map(|p| p.version.as_str()),
    );
    properties
}

/// Replace `${name}` placeholders, following references between properties.
/// Unknown placeholders are left as they are.
fn interpolate(text: &str, properties: &BTreeMap<String, String>) -> String {
    let mut current = text.to_string();
    // bounded so that cyclic definitions terminate
    for _ in 0..10 {
        let mut out = String::with_capacity(current.len());
        let mut rest = current.as_str();
        let mut changed = false;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match properties.get(name) {
                        Some(value) => {
                            out.push_str(value);
                            changed = true;
                        }
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        if !changed {
            return out;
        }
        current = out;
    }
    current
}

/// Parse a `pom.xml` into a plain-text source carrying its
/// [`MavenResolutionResult`].
pub fn parse_pom_source(path: impl Into<PathBuf>, text: &str) -> Result<SourceFile> {
    let pom = Pom::parse(text)?;
    let result = resolve(&pom);
    let source = SourceFile::text(path, text);
    let markers: Markers = source.markers().with(result);
    Ok(source.with_markers(markers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boot_pom(version: &str) -> String {
        format!(
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
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-test</artifactId>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>
"#
        )
    }

    fn versions(result: &MavenResolutionResult, artifact: &str, scope: Scope) -> Vec<String> {
        result
            .find_dependencies("org.springframework", artifact, scope)
            .into_iter()
            .map(|d| d.version.clone())
            .collect()
    }

    #[test]
    fn test_boot_parent_aligns_framework() {
        let result = resolve(&Pom::parse(&boot_pom("2.5.0")).unwrap());
        assert_eq!(result.spring_boot_version.as_deref(), Some("2.5.0"));
        assert_eq!(result.group_id.as_deref(), Some("com.example"));

        let starter = &result.dependencies[0];
        assert_eq!(starter.artifact_id, "spring-boot-starter");
        assert_eq!(starter.version, "2.5.0");
        assert!(starter.is_direct());

        assert_eq!(versions(&result, "spring-core", Scope::Runtime), vec!["5.3.7"]);
        assert_eq!(versions(&result, "spring-context", Scope::Compile), vec!["5.3.7"]);
        // the test starter's copy is only visible on the test classpath
        assert_eq!(versions(&result, "spring-core", Scope::Test).len(), 2);

        let boot3 = resolve(&Pom::parse(&boot_pom("3.2.0")).unwrap());
        assert_eq!(versions(&boot3, "spring-core", Scope::Runtime), vec!["6.1.1"]);
    }

    #[test]
    fn test_unknown_boot_line_leaves_framework_unresolved() {
        let result = resolve(&Pom::parse(&boot_pom("9.9.0")).unwrap());
        assert!(versions(&result, "spring-core", Scope::Runtime).is_empty());
        assert_eq!(result.dependencies.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("Spring Boot 9.9.0")));
    }

    #[test]
    fn test_explicit_management_wins_over_boot() {
        let xml = r#"<project>
  <artifactId>demo</artifactId>
  <properties>
    <spring.version>5.2.9.RELEASE</spring.version>
  </properties>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-dependencies</artifactId>
        <version>2.7.0</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
      <dependency>
        <groupId>org.springframework</groupId>
        <artifactId>spring-core</artifactId>
        <version>${spring.version}</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
  </dependencies>
</project>"#;
        let result = resolve(&Pom::parse(xml).unwrap());
        assert_eq!(result.spring_boot_version.as_deref(), Some("2.7.0"));
        assert_eq!(
            versions(&result, "spring-core", Scope::Runtime),
            vec!["5.2.9.RELEASE"]
        );
        assert_eq!(
            versions(&result, "spring-context", Scope::Runtime),
            vec!["5.3.20"]
        );
    }

    #[test]
    fn test_direct_declaration_is_nearest() {
        let xml = r#"<project>
  <artifactId>demo</artifactId>
  <properties>
    <spring.version>5.3.30</spring.version>
  </properties>
  <dependencies>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-webmvc</artifactId>
      <version>${spring.version}</version>
    </dependency>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-core</artifactId>
      <version>5.3.31</version>
    </dependency>
  </dependencies>
</project>"#;
        let result = resolve(&Pom::parse(xml).unwrap());
        assert_eq!(result.spring_boot_version, None);
        assert_eq!(versions(&result, "spring-core", Scope::Runtime), vec!["5.3.31"]);
        assert_eq!(versions(&result, "spring-webmvc", Scope::Runtime), vec!["5.3.30"]);
        assert_eq!(versions(&result, "*", Scope::Runtime).len(), 2);
    }

    #[test]
    fn test_boot_starter_without_parent_uses_its_own_version() {
        let xml = r#"<project>
  <artifactId>demo</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter</artifactId>
      <version>3.2.0</version>
    </dependency>
  </dependencies>
</project>"#;
        let result = resolve(&Pom::parse(xml).unwrap());
        assert_eq!(result.spring_boot_version, None);
        assert_eq!(versions(&result, "spring-core", Scope::Runtime), vec!["6.1.1"]);
    }

    #[test]
    fn test_scope_filters_classpath() {
        let xml = r#"<project>
  <artifactId>demo</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-context</artifactId>
      <version>6.1.1</version>
      <scope>provided</scope>
    </dependency>
  </dependencies>
</project>"#;
        let result = resolve(&Pom::parse(xml).unwrap());
        assert!(versions(&result, "spring-core", Scope::Runtime).is_empty());
        assert_eq!(versions(&result, "spring-core", Scope::Compile), vec!["6.1.1"]);
    }

    #[test]
    fn test_unresolvable_version_is_skipped() {
        let xml = r#"<project>
  <artifactId>demo</artifactId>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>lib</artifactId>
      <version>${missing.version}</version>
    </dependency>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>unmanaged</artifactId>
    </dependency>
  </dependencies>
</project>"#;
        let result = resolve(&Pom::parse(xml).unwrap());
        assert!(result.dependencies.is_empty());
        assert_eq!(
            result.warnings,
            vec![
                "Could not resolve a version for com.example:lib".to_string(),
                "Could not resolve a version for com.example:unmanaged".to_string(),
            ]
        );
    }

    #[test]
    fn test_resolved_pom_has_no_warnings() {
        let result = resolve(&Pom::parse(&boot_pom("2.5.0")).unwrap());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_interpolate() {
        let props = BTreeMap::from([
            ("a".to_string(), "${b}-x".to_string()),
            ("b".to_string(), "1".to_string()),
            ("loop".to_string(), "${loop}".to_string()),
        ]);
        assert_eq!(interpolate("v${a}", &props), "v1-x");
        assert_eq!(interpolate("${unknown}", &props), "${unknown}");
        assert_eq!(interpolate("${open", &props), "${open");
        assert_eq!(interpolate("${loop}", &props), "${loop}");
    }

    #[test]
    fn test_spring_framework_version_table() {
        assert_eq!(spring_framework_version("2.5.0"), Some("5.3.7"));
        assert_eq!(spring_framework_version("2.5.14"), Some("5.3.7"));
        assert_eq!(spring_framework_version("3.2.0"), Some("6.1.1"));
        assert_eq!(spring_framework_version("1.4.0"), None);
        assert_eq!(spring_framework_version("bogus"), None);
    }

    #[test]
    fn test_parse_pom_source_attaches_marker() {
        let source = parse_pom_source("pom.xml", &boot_pom("2.5.0")).unwrap();
        assert_eq!(source.kind(), "text");
        let result = source.markers().find_first::<MavenResolutionResult>().unwrap();
        assert_eq!(result.artifact_id, "demo");
        assert!(parse_pom_source("pom.xml", "<project>").is_err());
    }
}

use crate::error::{MavenError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The parts of a `pom.xml` that dependency resolution needs. Values are kept
/// as written, `${...}` placeholders included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub parent: Option<Parent>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<Dependency>,
    pub dependency_management: Vec<Dependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub kind: Option<String>,
}

impl Pom {
    /// Parse the text of a `pom.xml`.
    ///
    /// ```
    /// use retree_maven::v1::Pom;
    ///
    /// let pom = Pom::parse(
    ///     "<project><groupId>com.example</groupId><artifactId>demo</artifactId></project>",
    /// )
    /// .unwrap();
    /// assert_eq!(pom.artifact_id, "demo");
    /// ```
    pub fn parse(xml: &str) -> Result<Pom> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut pom = Pom::default();
        let mut artifact_id = None;
        let mut path: Vec<String> = Vec::new();
        let mut dependency: Option<Dependency> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if name == "dependency" && is_dependency_list(&path) {
                        dependency = Some(Dependency::default());
                    }
                    path.push(name);
                }
                Event::End(_) => {
                    if path.last().map(String::as_str) == Some("dependency") {
                        path.pop();
                        if let Some(dep) = dependency.take() {
                            if is_managed_list(&path) {
                                pom.dependency_management.push(dep);
                            } else if is_dependency_list(&path) {
                                pom.dependencies.push(dep);
                            }
                        }
                    } else {
                        path.pop();
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                    match segments.as_slice() {
                        ["project", "groupId"] => pom.group_id = Some(text),
                        ["project", "artifactId"] => artifact_id = Some(text),
                        ["project", "version"] => pom.version = Some(text),
                        ["project", "parent", field] => {
                            let parent = pom.parent.get_or_insert_with(Parent::default);
                            match *field {
                                "groupId" => parent.group_id = text,
                                "artifactId" => parent.artifact_id = text,
                                "version" => parent.version = text,
                                _ => {}
                            }
                        }
                        ["project", "properties", name] => {
                            pom.properties.insert(name.to_string(), text);
                        }
                        [.., "dependencies", "dependency", field] => {
                            if let Some(dep) = dependency.as_mut() {
                                dep.set(field, text);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        pom.artifact_id = artifact_id.ok_or(MavenError::MissingElement("artifactId"))?;
        Ok(pom)
    }

    /// The group id, inherited from the parent when not declared.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// The version, inherited from the parent when not declared.
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }
}

/// `project/dependencies` or `project/dependencyManagement/dependencies`.
fn is_dependency_list(path: &[String]) -> bool {
    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
    matches!(
        segments.as_slice(),
        ["project", "dependencies"] | ["project", "dependencyManagement", "dependencies"]
    )
}

fn is_managed_list(path: &[String]) -> bool {
    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
    segments.as_slice() == ["project", "dependencyManagement", "dependencies"]
}

impl Dependency {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "groupId" => self.group_id = value,
            "artifactId" => self.artifact_id = value,
            "version" => self.version = Some(value),
            "scope" => self.scope = Some(value),
            "type" => self.kind = Some(value),
            _ => {}
        }
    }

    /// A `<scope>import</scope>` entry of `<type>pom</type>`.
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.kind.as_deref() == Some("pom")
    }
}

/// A Maven dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// Whether a dependency in this scope is visible on the `classpath`
    /// scope's classpath. Compile dependencies are visible at runtime and in
    /// tests; runtime dependencies are not visible at compile time.
    pub fn is_in_classpath_of(self, classpath: Scope) -> bool {
        use Scope::*;
        match self {
            Compile => matches!(classpath, Compile | Runtime | Test),
            Provided => matches!(classpath, Provided | Compile | Test),
            Runtime => matches!(classpath, Runtime | Test),
            Test => classpath == Test,
            System => matches!(classpath, System | Compile | Test),
            Import => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl FromStr for Scope {
    type Err = MavenError;

    fn from_str(s: &str) -> Result<Scope> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compile" => Ok(Scope::Compile),
            "provided" => Ok(Scope::Provided),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            "import" => Ok(Scope::Import),
            _ => Err(MavenError::UnknownScope(s.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

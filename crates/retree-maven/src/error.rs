use thiserror::Error;

pub type Result<T> = std::result::Result<T, MavenError>;

#[derive(Debug, Error)]
pub enum MavenError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("POM is missing <{0}>")]
    MissingElement(&'static str),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("invalid version selector: {0}")]
    InvalidSelector(String),

    #[error("unknown scope: {0}")]
    UnknownScope(String),
}

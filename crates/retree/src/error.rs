use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid glob: {0}")]
    Glob(#[from] globset::Error),

    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("values can only be inserted at mapping nodes, found {0}")]
    NotAMapping(&'static str),

    #[error("inserting values into a mapping is not supported")]
    InsertUnsupported,
}

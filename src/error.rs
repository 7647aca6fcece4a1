use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type for update-commit operations
#[derive(Error, Debug)]
pub enum UpdateCommitError {
    #[error("Argument error: {0}")]
    ArgumentCount(String),

    #[error("'{}' is not a valid directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Required file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in update-commit
pub type Result<T> = std::result::Result<T, UpdateCommitError>;

impl UpdateCommitError {
    /// Create an argument error with context
    pub fn arguments(msg: impl Into<String>) -> Self {
        UpdateCommitError::ArgumentCount(msg.into())
    }

    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        UpdateCommitError::Parse(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        UpdateCommitError::Config(msg.into())
    }

    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        UpdateCommitError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

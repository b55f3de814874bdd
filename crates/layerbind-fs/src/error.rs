//! Error types for layerbind-fs

use std::path::PathBuf;

/// Result type for layerbind-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in layerbind-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Could not locate repository root directory")]
    RepositoryNotFound,

    #[error("Cannot determine location of {path}")]
    NotFound { path: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for layerbind-core

use std::path::PathBuf;

use crate::curve::CurveError;

/// Result type for layerbind-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading overrides or binding fields
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file holds a value of a shape the store cannot carry
    #[error("Unsupported configuration value for '{key}' in {path}")]
    UnsupportedValue { path: PathBuf, key: String },

    /// A raw override cannot be converted to the field's declared shape
    #[error("Cannot convert {found} to {expected} for '{key}'")]
    Conversion {
        key: String,
        expected: String,
        found: String,
    },

    /// A curve literal failed to parse
    #[error("Invalid curve for '{key}': {source}")]
    Curve {
        key: String,
        #[source]
        source: CurveError,
    },

    /// Enumerating a component's fields failed; carries the first cause
    #[error("Failed to enumerate fields of component '{component}': {cause}")]
    Scan { component: String, cause: String },

    /// Two descriptors of one component resolve to the same key
    #[error("Field '{key}' is declared more than once in component '{component}'")]
    DuplicateField { component: String, key: String },

    /// An error-behavior override names a behavior that does not exist
    #[error("Unknown error behavior '{token}' for category {category}")]
    UnknownBehavior { category: String, token: String },

    /// The process-wide manager was installed twice
    #[error("A configuration manager is already installed")]
    AlreadyInstalled,

    /// Filesystem or location error from layerbind-fs
    #[error(transparent)]
    Fs(#[from] layerbind_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

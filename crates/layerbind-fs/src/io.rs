//! File reading helpers

use std::fs;

use serde_json::Value;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read and parse a JSON document.
///
/// Returns `Ok(None)` when the file does not exist; a missing layer is not an
/// error.
pub fn read_json(path: &NormalizedPath) -> Result<Option<Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = read_text(path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            format: "JSON".into(),
            message: e.to_string(),
        })
}

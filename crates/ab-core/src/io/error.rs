//! Error types for launch file I/O

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, merging, or writing a launch file
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Existing file cannot be parsed; it is left untouched
    #[error("{path} is not a valid launch configuration file: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize the merged document
    #[error("failed to serialize launch configurations for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl DocumentError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, DocumentError::Corrupt { .. })
    }
}

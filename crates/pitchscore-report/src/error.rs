//! Error types for report rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering or writing a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Report could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Unknown report format name
    #[error("Unknown report format '{0}' (expected 'markdown' or 'json')")]
    UnknownFormat(String),
}

//! Error types for the CLI application.

use pitchscore_extractor::ExtractorError;
use pitchscore_llm::LlmError;
use pitchscore_report::ReportError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model client could not be created
    #[error("Model client error: {0}")]
    Llm(#[from] LlmError),

    /// Extraction error
    #[error("{0}")]
    Extractor(#[from] ExtractorError),

    /// Report rendering or writing failed
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some documents produced no scorecard
    #[error("{failed} of {total} document(s) produced no scorecard")]
    DocumentsFailed {
        /// Documents without a record
        failed: usize,
        /// Documents processed
        total: usize,
    },
}

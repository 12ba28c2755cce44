//! Error types for the Extractor

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while turning a document into a scorecard
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Extracted text is blank; no model call is made
    #[error("No extractable text found in the document")]
    EmptyInput,

    /// Transport, auth or rate-limit failure from the model client
    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    /// A model call exceeded the per-attempt timeout
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    /// Repaired model output still could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Parsed document does not satisfy the required-field contract
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Source document could not be read or converted to text
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractorError::EmptyInput => "empty_input",
            ExtractorError::ModelInvocation(_) => "model_invocation",
            ExtractorError::Timeout(_) => "timeout",
            ExtractorError::Parse(_) => "parse",
            ExtractorError::Validation(_) => "validation",
            ExtractorError::Document(_) => "document",
            ExtractorError::Config(_) => "config",
        }
    }
}

impl From<json5::Error> for ExtractorError {
    fn from(e: json5::Error) -> Self {
        ExtractorError::Parse(e.to_string())
    }
}

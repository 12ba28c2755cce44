//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::ScorecardRecord;
use std::future::Future;

/// Sampling settings passed with every model call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Ask the provider for a JSON-only response when it supports that
    pub json_mode: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 4000,
            json_mode: true,
        }
    }
}

/// Trait for generative-model operations
///
/// Implemented by the infrastructure layer (pitchscore-llm). Implementations
/// must not retry internally; retry policy belongs to the caller.
pub trait LlmProvider: Send + Sync {
    /// Error type for model operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Model identifier, for logs and diagnostics
    fn model_name(&self) -> &str;

    /// Send a prompt and return the raw text output
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Trait for turning document bytes into plain text
///
/// Implemented by the application layer (pitchscore-extractor)
pub trait TextExtractor: Send + Sync {
    /// Error type for extraction operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract plain text from a document
    fn extract(&self, bytes: &[u8]) -> Result<String, Self::Error>;
}

/// Trait for rendering a record into a report document
///
/// Implemented by the presentation layer (pitchscore-report)
pub trait Renderer: Send + Sync {
    /// Error type for rendering operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Render a validated record to document bytes
    fn render(&self, record: &ScorecardRecord) -> Result<Vec<u8>, Self::Error>;

    /// File extension for documents produced by this renderer (no dot)
    fn file_extension(&self) -> &'static str;
}

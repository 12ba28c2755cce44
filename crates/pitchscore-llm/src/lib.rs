//! pitchscore LLM Provider Layer
//!
//! Pluggable model client implementations of the `LlmProvider` trait from
//! `pitchscore-domain`.
//!
//! # Providers
//!
//! - `GeminiProvider`: hosted Gemini `generateContent` API
//! - `OllamaProvider`: local Ollama API
//! - `MockProvider`: deterministic, scripted mock for testing
//!
//! Providers never retry on their own. A failed call returns an [`LlmError`]
//! and the caller decides whether to try again.
//!
//! # Examples
//!
//! ```
//! use pitchscore_llm::MockProvider;
//! use pitchscore_domain::{GenerationParams, LlmProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new("{\"StartupName\": \"Acme\"}");
//! let text = provider.generate("prompt", &GenerationParams::default()).await.unwrap();
//! assert!(text.contains("Acme"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod ollama;

use pitchscore_domain::{GenerationParams, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during model calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Timeout, connection failure or server-side error; worth retrying
    #[error("Transient error: {0}")]
    Transient(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Invalid or missing credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response could not be decoded or carried no text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            LlmError::Transient(e.to_string())
        } else if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Other(e.to_string())
        }
    }
}

/// Map a non-success HTTP status to an error
pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str, model: &str) -> LlmError {
    use reqwest::StatusCode;

    let detail = format!("HTTP {}: {}", status, truncate(body, 300));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(detail),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::REQUEST_TIMEOUT => LlmError::Transient(detail),
        s if s.is_server_error() => LlmError::Transient(detail),
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => LlmError::Auth(detail),
        _ => LlmError::Other(detail),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}

/// Mock LLM provider for deterministic testing
///
/// Replies are taken from a script first (in order); once the script is
/// exhausted every call gets the default reply. No network calls are made.
///
/// # Examples
///
/// ```
/// use pitchscore_llm::{LlmError, MockProvider};
/// use pitchscore_domain::{GenerationParams, LlmProvider};
///
/// # async fn example() {
/// let provider = MockProvider::new("fallback");
/// provider.push_error(LlmError::Transient("timeout".into()));
/// provider.push_response("first");
///
/// let params = GenerationParams::default();
/// assert!(provider.generate("p", &params).await.is_err());
/// assert_eq!(provider.generate("p", &params).await.unwrap(), "first");
/// assert_eq!(provider.generate("p", &params).await.unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: Result<String, LlmError>,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: Ok(response.into()),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Create a MockProvider whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        let mut provider = Self::new("");
        provider.default_reply = Err(error);
        provider
    }

    /// Delay every reply, to exercise caller timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock_script().push_back(Ok(response.into()));
    }

    /// Queue a failing reply
    pub fn push_error(&self, error: LlmError) {
        self.lock_script().push_back(Err(error));
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, LlmError>>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_reply(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        self.lock_script()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String, LlmError> {
        let reply = self.next_reply(prompt);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        reply
    }
}

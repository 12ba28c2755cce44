//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running the
//! pipeline against a local model instead of the hosted one.
//!
//! # Examples
//!
//! ```no_run
//! use pitchscore_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! ```

use crate::{classify_status, LlmError};
use pitchscore_domain::{GenerationParams, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default HTTP timeout for one request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Ollama API provider for local LLM inference
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    fn build_request<'a>(&'a self, prompt: &'a str, params: &GenerationParams) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: params.json_mode.then_some("json"),
            options: OllamaOptions {
                temperature: params.temperature,
                num_predict: params.max_output_tokens,
            },
        }
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = self.build_request(prompt, params);

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending Ollama generate request");

        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body, &self.model));
        }

        let ollama_response: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(ollama_response.response)
    }
}

//! Configuration for the Extractor

use crate::validator::ValidationMode;
use pitchscore_domain::GenerationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard ceiling on model calls per document
pub const MAX_ATTEMPTS_LIMIT: u32 = 5;

/// Default character budget for source text embedded in the prompt
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 28_000;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum source characters embedded in the prompt
    pub max_prompt_chars: usize,

    /// Model calls per document before giving up (1..=5)
    pub max_attempts: u32,

    /// Backoff after the first failed attempt (milliseconds); doubles each time
    pub base_backoff_ms: u64,

    /// Upper bound on a single backoff wait (milliseconds)
    pub max_backoff_ms: u64,

    /// Maximum time for a single model call (seconds)
    pub attempt_timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Also replace double quotes in the source text before prompting
    pub strict_sanitize: bool,

    /// How deeply parsed documents are checked
    pub validation_mode: ValidationMode,

    /// Replace the model's overall score with the mean of section scores
    pub derive_overall_score: bool,

    /// Documents processed concurrently in a batch
    pub max_concurrency: usize,
}

impl ExtractorConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Backoff to wait after failed attempt number `attempt` (1-based)
    ///
    /// `base * 2^(attempt-1)`, capped at `max_backoff_ms`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let millis = self
            .base_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }

    /// Sampling settings for the model client
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            json_mode: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(format!(
                "max_attempts must be between 1 and {}",
                MAX_ATTEMPTS_LIMIT
            ));
        }
        if self.attempt_timeout_secs == 0 {
            return Err("attempt_timeout_secs must be greater than 0".to_string());
        }
        if self.max_backoff_ms < self.base_backoff_ms {
            return Err("max_backoff_ms cannot be less than base_backoff_ms".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_attempts: 3,
            base_backoff_ms: 1_000,
            max_backoff_ms: 16_000,
            attempt_timeout_secs: 120,
            temperature: 0.3,
            max_output_tokens: 4_000,
            strict_sanitize: false,
            validation_mode: ValidationMode::Strict,
            derive_overall_score: false,
            max_concurrency: 4,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: fewer attempts, shorter waits for faster feedback
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 2,
            base_backoff_ms: 250,
            max_backoff_ms: 2_000,
            attempt_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Lenient preset: the full attempt budget, longer timeouts and
    /// presence-only validation
    pub fn lenient() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS_LIMIT,
            base_backoff_ms: 2_000,
            max_backoff_ms: 30_000,
            attempt_timeout_secs: 300,
            strict_sanitize: true,
            validation_mode: ValidationMode::Presence,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

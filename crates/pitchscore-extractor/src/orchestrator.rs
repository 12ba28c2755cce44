//! Bounded retry loop around the model call

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::ScorecardParser;
use crate::prompt::{schema_for, PromptBuilder};
use crate::repair::RepairPipeline;
use crate::validator::SchemaValidator;
use pitchscore_domain::{ExtractionRequest, LlmProvider, RunId, ScorecardRecord};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Where a run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// Attempt `n` (1-based) is in flight
    Attempting(u32),
    /// A record was produced
    Success,
    /// Every attempt failed
    ExhaustedFailure,
}

/// One failed attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    /// 1-based attempt number
    pub attempt: u32,
    /// Why the attempt failed
    pub error: ExtractorError,
}

/// Result of running one request through the retry loop
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Run identifier used in logs
    pub run_id: RunId,

    /// Source document name
    pub source_name: String,

    /// The validated record, if any attempt succeeded
    pub record: Option<ScorecardRecord>,

    /// Most recent raw model response, kept for diagnostics
    pub last_raw_response: Option<String>,

    /// Number of model calls made
    pub attempts: u32,

    /// Every failed attempt in order
    pub failures: Vec<AttemptFailure>,

    /// Wall-clock time spent on the run
    pub elapsed: Duration,

    /// Terminal state: `Success` or `ExhaustedFailure`
    pub state: AttemptState,
}

impl ExtractionOutcome {
    /// True if a record was produced
    pub fn is_success(&self) -> bool {
        self.state == AttemptState::Success
    }

    /// The error of the final failed attempt
    pub fn last_error(&self) -> Option<&ExtractorError> {
        self.failures.last().map(|f| &f.error)
    }
}

/// Drives prompt, model call, repair, parse and validation for a request,
/// retrying up to the configured number of attempts
pub struct RetryOrchestrator<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    parser: ScorecardParser,
    config: ExtractorConfig,
}

impl<L> RetryOrchestrator<L>
where
    L: LlmProvider,
{
    /// Create a new orchestrator
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::from_shared(Arc::new(llm_provider), config)
    }

    /// Create an orchestrator around a shared model client
    pub fn from_shared(llm_provider: Arc<L>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider,
            parser: ScorecardParser::from_config(&config),
            config,
        })
    }

    /// Use a different validator (e.g. another field set)
    pub fn with_validator(mut self, validator: SchemaValidator) -> Self {
        self.parser = self.parser.with_validator(validator);
        self
    }

    /// Use a different repair pipeline
    pub fn with_repair_pipeline(mut self, pipeline: RepairPipeline) -> Self {
        self.parser = self.parser.with_pipeline(pipeline);
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Name of the model behind this orchestrator
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Run the request to success or exhaustion
    ///
    /// Only blank input is returned as `Err`; model, timeout, parse and
    /// validation failures are retried and reported in the outcome.
    pub async fn run(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome, ExtractorError> {
        let run_id = request.run_id;
        let source = request.source_name.as_str();

        if request.is_blank() {
            warn!(run_id = %run_id.short(), source, "No text to analyze, skipping model call");
            return Err(ExtractorError::EmptyInput);
        }

        let started = Instant::now();
        let prompt = PromptBuilder::new(request.source_text.as_str())
            .with_schema(schema_for(self.parser.validator().fields()))
            .with_budget(request.model_budget_chars)
            .strict(self.config.strict_sanitize)
            .build();
        let params = self.config.generation_params();
        let max_attempts = self.config.max_attempts;

        info!(
            run_id = %run_id.short(),
            source,
            model = self.llm_provider.model_name(),
            prompt_chars = prompt.len(),
            max_attempts,
            "Starting scorecard extraction"
        );

        let mut last_raw_response = None;
        let mut failures = Vec::new();

        for attempt in 1..=max_attempts {
            let state = AttemptState::Attempting(attempt);
            debug!(run_id = %run_id.short(), ?state, "Calling model");

            let result = match timeout(
                self.config.attempt_timeout(),
                self.llm_provider.generate(&prompt, &params),
            )
            .await
            {
                Err(_) => Err(ExtractorError::Timeout(self.config.attempt_timeout())),
                Ok(Err(e)) => Err(ExtractorError::ModelInvocation(e.to_string())),
                Ok(Ok(raw)) => {
                    debug!(run_id = %run_id.short(), attempt, response_chars = raw.len(), "Model responded");
                    let parsed = self.parser.process(&raw);
                    last_raw_response = Some(raw);
                    parsed
                }
            };

            match result {
                Ok(record) => {
                    info!(
                        run_id = %run_id.short(),
                        source,
                        attempt,
                        startup = %record.startup_name,
                        "Scorecard extracted"
                    );
                    return Ok(ExtractionOutcome {
                        run_id,
                        source_name: request.source_name.clone(),
                        record: Some(record),
                        last_raw_response,
                        attempts: attempt,
                        failures,
                        elapsed: started.elapsed(),
                        state: AttemptState::Success,
                    });
                }
                Err(error) => {
                    warn!(
                        run_id = %run_id.short(),
                        source,
                        attempt,
                        max_attempts,
                        kind = error.kind(),
                        "Attempt failed: {}",
                        error
                    );
                    failures.push(AttemptFailure { attempt, error });
                }
            }

            if attempt < max_attempts {
                let backoff = self.config.backoff_for(attempt);
                debug!(run_id = %run_id.short(), ?backoff, "Backing off before next attempt");
                sleep(backoff).await;
            }
        }

        warn!(
            run_id = %run_id.short(),
            source,
            attempts = max_attempts,
            "All attempts failed, no scorecard produced"
        );

        Ok(ExtractionOutcome {
            run_id,
            source_name: request.source_name.clone(),
            record: None,
            last_raw_response,
            attempts: max_attempts,
            failures,
            elapsed: started.elapsed(),
            state: AttemptState::ExhaustedFailure,
        })
    }
}

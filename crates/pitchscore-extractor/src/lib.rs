//! pitchscore Extractor
//!
//! Turns the text of a pitch deck into a validated [`ScorecardRecord`] using
//! a language model.
//!
//! # Overview
//!
//! Model output is not trusted. Every response goes through a repair
//! pipeline, a JSON parse and a required-field check before it becomes a
//! record, and the whole model call is retried a bounded number of times.
//! A run either produces a complete record or reports that none was
//! produced, together with the last raw response for diagnostics.
//!
//! # Architecture
//!
//! ```text
//! Document → TextExtractor → PromptBuilder → LlmProvider
//!          → RepairPipeline → json5 → SchemaValidator → ScorecardRecord
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use pitchscore_extractor::{ExtractorConfig, RetryOrchestrator, ScorecardPipeline};
//! use pitchscore_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("{\"StartupName\": \"Acme\"}");
//! let orchestrator = RetryOrchestrator::new(llm, ExtractorConfig::default())?;
//! let pipeline = ScorecardPipeline::new(orchestrator);
//!
//! let outcome = pipeline.analyze_text("acme.pdf", "Acme builds rockets").await?;
//! match outcome.record {
//!     Some(record) => println!("Scored {}: {}", record.startup_name, record.overall_score),
//!     None => println!("No scorecard after {} attempts", outcome.attempts),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`ScorecardRecord`]: pitchscore_domain::ScorecardRecord

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod parser;
mod pipeline;
mod record;
mod scoring;
mod text;
mod validator;

pub mod prompt;
pub mod repair;


pub use config::{ExtractorConfig, DEFAULT_MAX_PROMPT_CHARS, MAX_ATTEMPTS_LIMIT};
pub use error::ExtractorError;
pub use orchestrator::{AttemptFailure, AttemptState, ExtractionOutcome, RetryOrchestrator};
pub use parser::{repair_and_parse, repair_and_parse_with, ScorecardParser};
pub use pipeline::{DocumentOutcome, ScorecardPipeline, SourceDocument};
pub use prompt::{schema_for, PromptBuilder};
pub use record::to_record;
pub use repair::{RepairPass, RepairPipeline};
pub use scoring::{apply_derived_score, derive_overall_score, section_score};
pub use text::{normalize_whitespace, DocumentExtractor, PdfTextExtractor, PlainTextExtractor};
pub use validator::{SchemaValidator, ValidationMode};

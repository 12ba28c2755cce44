//! pitchscore Domain Layer
//!
//! Core types shared by every other crate in the workspace. This crate holds
//! the scorecard model, the required-field contract and the trait interfaces
//! for the external collaborators (model client, text extractor, renderer).
//!
//! ## Key Concepts
//!
//! - **Record**: the validated [`ScorecardRecord`] produced by the pipeline
//! - **Section**: a named top-level grouping within the record
//! - **Leaf score**: an individual [`Score`] nested inside a section's criterion
//! - **Required fields**: an injectable [`RequiredFields`] contract
//!
//! ## Architecture
//!
//! - No infrastructure code (HTTP, PDF parsing, rendering)
//! - Pure data and invariants only
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod request;
pub mod schema;
pub mod score;
pub mod scorecard;
pub mod traits;

// Re-exports for convenience
pub use request::{ExtractionRequest, RunId};
pub use schema::{RequiredFields, SectionKind};
pub use score::Score;
pub use scorecard::{
    BenchmarkEntry, CompetitorEntry, CriteriaMatrix, RiskEntry, ScoredCriterion,
    ScorecardRecord,
};
pub use traits::{GenerationParams, LlmProvider, Renderer, TextExtractor};

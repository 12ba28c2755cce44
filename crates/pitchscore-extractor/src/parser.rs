//! Parse raw model output into a validated scorecard record

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::record::to_record;
use crate::repair::RepairPipeline;
use crate::scoring::apply_derived_score;
use crate::validator::SchemaValidator;
use pitchscore_domain::{RequiredFields, ScorecardRecord};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Repair a raw response with the standard pipeline and parse it
pub fn repair_and_parse(raw: &str) -> Result<Value, ExtractorError> {
    repair_and_parse_with(raw, &RepairPipeline::standard())
}

/// Repair a raw response with a custom pipeline and parse it
///
/// The repaired text is read as JSON5, so trailing commas, single-quoted
/// strings, unquoted keys and comments are accepted. The top-level value
/// must be an object.
pub fn repair_and_parse_with(raw: &str, pipeline: &RepairPipeline) -> Result<Value, ExtractorError> {
    if raw.trim().is_empty() {
        return Err(ExtractorError::Parse("empty model response".to_string()));
    }

    let outcome = pipeline.repair_traced(raw);
    if !outcome.applied.is_empty() {
        debug!(passes = ?outcome.applied, "Repaired model response");
    }

    let value: Value = json5::from_str(&outcome.text)?;
    if !value.is_object() {
        return Err(ExtractorError::Parse(format!(
            "expected a JSON object, found {}",
            json_type_name(&value)
        )));
    }
    Ok(value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Repair, parse, validate and convert one model response
#[derive(Debug)]
pub struct ScorecardParser {
    pipeline: RepairPipeline,
    validator: SchemaValidator,
    derive_score: bool,
}

impl ScorecardParser {
    /// Create a parser from its parts
    pub fn new(pipeline: RepairPipeline, validator: SchemaValidator, derive_score: bool) -> Self {
        Self {
            pipeline,
            validator,
            derive_score,
        }
    }

    /// Standard repair pipeline, the full field set and the configured
    /// validation mode
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            RepairPipeline::standard(),
            SchemaValidator::new(Arc::new(RequiredFields::default()), config.validation_mode),
            config.derive_overall_score,
        )
    }

    /// Replace the validator
    pub fn with_validator(mut self, validator: SchemaValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Replace the repair pipeline
    pub fn with_pipeline(mut self, pipeline: RepairPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// The validator in use
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// Turn a raw response into a record, or say why it cannot be used
    pub fn process(&self, raw: &str) -> Result<ScorecardRecord, ExtractorError> {
        let doc = repair_and_parse_with(raw, &self.pipeline)?;
        self.validator.validate(&doc)?;

        let mut record = to_record(&doc);
        if self.derive_score {
            apply_derived_score(&mut record);
        }
        Ok(record)
    }
}

impl Default for ScorecardParser {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

//! Repair command implementation.

use crate::cli::RepairArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pitchscore_domain::ScorecardRecord;
use pitchscore_extractor::{
    ExtractorError, RepairPipeline, SchemaValidator, ScorecardParser, ValidationMode,
};
use std::io::Read;
use std::sync::Arc;

/// Execute the repair command.
pub async fn execute_repair(args: RepairArgs, formatter: &Formatter) -> Result<()> {
    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    match repair(&args, &raw) {
        Ok(record) => {
            println!("{}", formatter.format_record(&record)?);
            Ok(())
        }
        Err(ExtractorError::Validation(problems)) => {
            println!("{}", formatter.format_problems(&problems)?);
            Err(CliError::InvalidInput(format!(
                "{} validation problem(s)",
                problems.len()
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the same repair, parse and validation steps as a model response.
fn repair(args: &RepairArgs, raw: &str) -> std::result::Result<ScorecardRecord, ExtractorError> {
    let mode = if args.presence {
        ValidationMode::Presence
    } else {
        ValidationMode::Strict
    };
    let validator = SchemaValidator::new(Arc::new(args.schema.into()), mode);
    ScorecardParser::new(RepairPipeline::standard(), validator, args.derive_score).process(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SchemaArg;
    use crate::commands::SAMPLE_RESPONSE;
    use pitchscore_domain::Score;

    fn args(presence: bool, derive_score: bool, schema: SchemaArg) -> RepairArgs {
        RepairArgs {
            file: None,
            presence,
            derive_score,
            schema,
        }
    }

    #[test]
    fn test_repairs_fenced_truncated_response() {
        let raw = format!(
            "Here you go:\n```json\n{}",
            SAMPLE_RESPONSE.trim_end().trim_end_matches('}')
        );
        let record = repair(&args(false, false, SchemaArg::V1), &raw).unwrap();
        assert_eq!(record.startup_name, "Sample Startup");
        assert_eq!(record.overall_score, Score::Rated(68.0));
    }

    #[test]
    fn test_derive_score() {
        let record = repair(&args(false, true, SchemaArg::V1), SAMPLE_RESPONSE).unwrap();
        assert_ne!(record.overall_score, Score::Rated(68.0));
        assert!(record.overall_score.is_rated());
    }

    #[test]
    fn test_missing_fields_reported() {
        let raw = r#"{"StartupName": "Acme", "OverallScore": 70}"#;
        match repair(&args(true, false, SchemaArg::V1), raw) {
            Err(ExtractorError::Validation(problems)) => {
                assert!(problems.iter().any(|p| p.contains("'Sector'")));
            }
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_input() {
        let result = repair(&args(true, false, SchemaArg::Compact), "no json here");
        assert!(matches!(result, Err(ExtractorError::Parse(_))));
    }
}

//! Prompt command implementation.

use crate::cli::PromptArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use pitchscore_domain::{RequiredFields, TextExtractor};
use pitchscore_extractor::{schema_for, DocumentExtractor, PromptBuilder, SourceDocument};

/// Execute the prompt command.
pub async fn execute_prompt(args: PromptArgs, config: &Config) -> Result<()> {
    println!("{}", build_prompt(&args, config)?);
    Ok(())
}

/// The prompt the analyze command would send for this document.
fn build_prompt(args: &PromptArgs, config: &Config) -> Result<String> {
    let doc = SourceDocument::from_path(&args.file)?;
    let text = DocumentExtractor::for_name(&doc.name).extract(&doc.bytes)?;
    if text.trim().is_empty() {
        return Err(CliError::InvalidInput(format!(
            "No extractable text in {}",
            args.file.display()
        )));
    }

    let budget = args.budget.unwrap_or(config.extractor.max_prompt_chars);
    if budget == 0 {
        return Err(CliError::InvalidInput("Budget must be greater than 0".to_string()));
    }

    let fields: RequiredFields = args.schema.into();
    Ok(PromptBuilder::new(text)
        .with_schema(schema_for(&fields))
        .with_budget(budget)
        .strict(config.extractor.strict_sanitize)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SchemaArg;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_embeds_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "Acme Rockets ```builds``` launchers").unwrap();

        let args = PromptArgs {
            file: path,
            budget: None,
            schema: SchemaArg::V1,
        };
        let prompt = build_prompt(&args, &Config::default()).unwrap();
        assert!(prompt.contains("SectorAnalysisIndia"));
        assert!(prompt.contains("PITCH DECK:"));
        assert!(prompt.contains("Acme Rockets builds launchers"));
    }

    #[test]
    fn test_budget_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "abcdefghij").unwrap();

        let args = PromptArgs {
            file: path,
            budget: Some(4),
            schema: SchemaArg::V1,
        };
        let prompt = build_prompt(&args, &Config::default()).unwrap();
        assert!(prompt.trim_end().ends_with("abcd"));
    }

    #[test]
    fn test_compact_schema_omits_regional_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "Acme Rockets").unwrap();

        let args = PromptArgs {
            file: path,
            budget: None,
            schema: SchemaArg::Compact,
        };
        let prompt = build_prompt(&args, &Config::default()).unwrap();
        assert!(prompt.contains("\"FoundersEvaluation\""));
        assert!(!prompt.contains("SectorAnalysisIndia"));
        assert!(!prompt.contains("TracxnStyleBenchmark"));
    }

    #[test]
    fn test_blank_document_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "\n\n").unwrap();

        let args = PromptArgs {
            file: path,
            budget: None,
            schema: SchemaArg::V1,
        };
        assert!(matches!(
            build_prompt(&args, &Config::default()),
            Err(CliError::InvalidInput(_))
        ));
    }
}

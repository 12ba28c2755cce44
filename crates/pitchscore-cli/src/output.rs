//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pitchscore_domain::ScorecardRecord;
use pitchscore_extractor::{section_score, DocumentOutcome};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// One line of the analyze summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    /// Document name
    pub document: String,
    /// Whether a scorecard was produced
    pub success: bool,
    /// Startup name from the record
    pub startup: Option<String>,
    /// Overall score as displayed
    pub score: Option<String>,
    /// Model calls made
    pub attempts: u32,
    /// Written report
    pub report: Option<PathBuf>,
    /// Why no scorecard was produced
    pub error: Option<String>,
}

impl SummaryRow {
    /// Build a row from a batch outcome and the report written for it.
    pub fn from_outcome(outcome: &DocumentOutcome, report: Option<PathBuf>, report_error: Option<String>) -> Self {
        match &outcome.result {
            Ok(run) => {
                let record = run.record.as_ref();
                let error = match (record, report_error) {
                    (Some(_), Some(e)) => Some(e),
                    (Some(_), None) => None,
                    (None, _) => Some(
                        run.last_error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "no scorecard produced".to_string()),
                    ),
                };
                Self {
                    document: outcome.name.clone(),
                    success: record.is_some() && error.is_none(),
                    startup: record.map(|r| r.startup_name.clone()),
                    score: record.map(|r| r.overall_score.to_string()),
                    attempts: run.attempts,
                    report,
                    error,
                }
            }
            Err(e) => Self {
                document: outcome.name.clone(),
                success: false,
                startup: None,
                score: None,
                attempts: 0,
                report: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the analyze summary.
    pub fn format_summary(&self, rows: &[SummaryRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Table => Ok(self.format_summary_table(rows)),
            OutputFormat::Quiet => Ok(rows
                .iter()
                .filter_map(|r| r.report.as_ref())
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_summary_table(&self, rows: &[SummaryRow]) -> String {
        if rows.is_empty() {
            return self.colorize("No documents processed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Document", "Status", "Startup", "Score", "Attempts", "Report / Error"]);

        for row in rows {
            let status = if row.success { "ok" } else { "failed" };
            let detail = match (&row.report, &row.error) {
                (_, Some(error)) => error.clone(),
                (Some(path), None) => path.display().to_string(),
                (None, None) => String::new(),
            };
            builder.push_record([
                row.document.clone(),
                self.colorize(status, if row.success { "green" } else { "red" }),
                row.startup.clone().unwrap_or_default(),
                row.score.clone().unwrap_or_default(),
                row.attempts.to_string(),
                detail,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a record produced by the repair command.
    pub fn format_record(&self, record: &ScorecardRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.overall_score.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Section", "Criteria", "Section Score"]);
                for (title, matrix) in record.scored_sections() {
                    builder.push_record([
                        title.to_string(),
                        matrix.len().to_string(),
                        format!("{:.2}", section_score(matrix)),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\nOverall score: {}\n{}",
                    self.success(&format!("Valid scorecard for '{}'", record.startup_name)),
                    record.overall_score,
                    table
                ))
            }
        }
    }

    /// Format validation problems.
    pub fn format_problems(&self, problems: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "valid": false,
                "problems": problems,
            }))?),
            _ => Ok(problems
                .iter()
                .map(|p| self.error(p))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchscore_domain::{Score, ScoredCriterion};

    fn rows() -> Vec<SummaryRow> {
        vec![
            SummaryRow {
                document: "acme.pdf".to_string(),
                success: true,
                startup: Some("Acme".to_string()),
                score: Some("74".to_string()),
                attempts: 1,
                report: Some(PathBuf::from("reports/Scorecard_Acme.md")),
                error: None,
            },
            SummaryRow {
                document: "blank.pdf".to_string(),
                success: false,
                startup: None,
                score: None,
                attempts: 0,
                report: None,
                error: Some("No extractable text found in the document".to_string()),
            },
        ]
    }

    #[test]
    fn test_summary_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&rows()).unwrap();
        assert!(output.contains("Document"));
        assert!(output.contains("acme.pdf"));
        assert!(output.contains("failed"));
        assert!(output.contains("No extractable text"));
    }

    #[test]
    fn test_summary_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_summary(&rows()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["success"], true);
        assert_eq!(value[1]["attempts"], 0);
    }

    #[test]
    fn test_summary_quiet_lists_reports() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_summary(&rows()).unwrap();
        assert_eq!(output, "reports/Scorecard_Acme.md");
    }

    #[test]
    fn test_empty_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&[]).unwrap();
        assert!(output.contains("No documents processed"));
    }

    #[test]
    fn test_record_table() {
        let record = ScorecardRecord {
            startup_name: "Acme".to_string(),
            overall_score: Score::Rated(70.0),
            founders: vec![ScoredCriterion::new("Grit", Score::Rated(90.0), Vec::new())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let output = Formatter::new(OutputFormat::Table, false).format_record(&record).unwrap();
        assert!(output.contains("✓ Valid scorecard for 'Acme'"));
        assert!(output.contains("Founders Evaluation"));
        assert!(output.contains("90.00"));
    }

    #[test]
    fn test_problems_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_problems(&["missing required field 'Sector'".to_string()]).unwrap();
        assert!(output.contains("\"valid\": false"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}

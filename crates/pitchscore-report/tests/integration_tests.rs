//! Integration tests for pitchscore-report

use pitchscore_domain::{Score, ScoredCriterion, ScorecardRecord};
use pitchscore_report::{ReportError, ReportFormat, ReportWriter};
use tempfile::TempDir;

fn record() -> ScorecardRecord {
    ScorecardRecord {
        startup_name: "Medly Health".to_string(),
        overall_score: Score::Rated(66.5),
        sector: "Healthtech".to_string(),
        business_model: vec![ScoredCriterion::new(
            "Pricing",
            Score::Rated(65.0),
            vec!["Subscription for clinics".to_string()],
        )]
        .into_iter()
        .collect(),
        ..Default::default()
    }
}

#[test]
fn test_write_markdown_report() {
    let dir = TempDir::new().unwrap();
    let mut writer = ReportWriter::new(ReportFormat::Markdown.renderer(40), dir.path());

    let path = writer.write(&record()).unwrap();

    assert_eq!(path.file_name().unwrap(), "Scorecard_Medly_Health.md");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("# Deep-Dive Scorecard: Medly Health"));
    assert!(content.contains("## Overall Score: 66.50/100"));
    assert!(content.contains("Subscription for clinics"));
}

#[test]
fn test_write_json_report_into_new_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("reports").join("batch-1");
    let mut writer = ReportWriter::new(ReportFormat::Json.renderer(0), &nested);

    let path = writer.write(&record()).unwrap();

    let back: ScorecardRecord =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, record());
}

#[test]
fn test_write_into_file_path_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let mut writer = ReportWriter::new(ReportFormat::Json.renderer(0), &blocker);
    assert!(matches!(writer.write(&record()), Err(ReportError::Write { .. })));
}

#[test]
fn test_same_startup_name_gets_distinct_files() {
    let dir = TempDir::new().unwrap();
    let mut writer = ReportWriter::new(ReportFormat::Markdown.renderer(40), dir.path());

    let mut second = record();
    second.sector = "Insurtech".to_string();
    let mut third = record();
    third.startup_name = "MEDLY health".to_string();

    let first_path = writer.write(&record()).unwrap();
    let second_path = writer.write(&second).unwrap();
    let third_path = writer.write(&third).unwrap();

    assert_eq!(first_path.file_name().unwrap(), "Scorecard_Medly_Health.md");
    assert_eq!(second_path.file_name().unwrap(), "Scorecard_Medly_Health_2.md");
    assert_eq!(third_path.file_name().unwrap(), "Scorecard_MEDLY_health_3.md");

    let first = std::fs::read_to_string(&first_path).unwrap();
    assert!(first.contains("Healthtech"));
    let second = std::fs::read_to_string(&second_path).unwrap();
    assert!(second.contains("Insurtech"));
}

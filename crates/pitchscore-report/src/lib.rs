//! pitchscore Report
//!
//! Renders a [`ScorecardRecord`] into a report document. The Markdown
//! report carries the full scorecard with tables; the JSON report is the
//! serialized record.

#![warn(missing_docs)]

mod error;
mod markdown;

use pitchscore_domain::{Renderer, ScorecardRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub use error::ReportError;
pub use markdown::{MarkdownRenderer, DEFAULT_WRAP_WIDTH};

/// Renders a record as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Error = ReportError;

    fn render(&self, record: &ScorecardRecord) -> Result<Vec<u8>, ReportError> {
        let mut bytes = serde_json::to_vec_pretty(record)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// Available report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown with tables
    #[default]
    Markdown,
    /// Serialized record
    Json,
}

impl ReportFormat {
    /// Build the renderer for this format
    pub fn renderer(self, wrap_width: usize) -> AnyRenderer {
        match self {
            ReportFormat::Markdown => AnyRenderer::Markdown(MarkdownRenderer::new(wrap_width)),
            ReportFormat::Json => AnyRenderer::Json(JsonRenderer),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// A renderer chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum AnyRenderer {
    /// Markdown report
    Markdown(MarkdownRenderer),
    /// JSON report
    Json(JsonRenderer),
}

impl Renderer for AnyRenderer {
    type Error = ReportError;

    fn render(&self, record: &ScorecardRecord) -> Result<Vec<u8>, ReportError> {
        match self {
            AnyRenderer::Markdown(r) => r.render(record),
            AnyRenderer::Json(r) => r.render(record),
        }
    }

    fn file_extension(&self) -> &'static str {
        match self {
            AnyRenderer::Markdown(r) => r.file_extension(),
            AnyRenderer::Json(r) => r.file_extension(),
        }
    }
}

/// `Scorecard_<startup name>.<ext>`, with spaces and unsafe characters
/// replaced by `_`
///
/// # Examples
///
/// ```
/// use pitchscore_domain::ScorecardRecord;
/// use pitchscore_report::report_file_name;
///
/// let record = ScorecardRecord {
///     startup_name: "Acme Rockets".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(report_file_name(&record, "md"), "Scorecard_Acme_Rockets.md");
/// ```
pub fn report_file_name(record: &ScorecardRecord, extension: &str) -> String {
    format!("{}.{}", report_stem(record), extension)
}

fn report_stem(record: &ScorecardRecord) -> String {
    let name = record.startup_name.trim();
    let name = if name.is_empty() { "Unnamed" } else { name };

    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        })
        .collect();

    format!("Scorecard_{}", safe)
}

/// Writes the reports of one batch into a directory
///
/// File names are unique within the batch: a second record with the same
/// startup name gets `Scorecard_<name>_2.<ext>`, and so on. Names are
/// compared case-insensitively so reports survive case-folding filesystems.
#[derive(Debug)]
pub struct ReportWriter<R> {
    renderer: R,
    dir: PathBuf,
    used: HashSet<String>,
}

impl<R> ReportWriter<R>
where
    R: Renderer<Error = ReportError>,
{
    /// Create a writer for `dir`; the directory is created on first write
    pub fn new(renderer: R, dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            dir: dir.into(),
            used: HashSet::new(),
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render a record and write it, returning the file path
    pub fn write(&mut self, record: &ScorecardRecord) -> Result<PathBuf, ReportError> {
        let bytes = self.renderer.render(record)?;
        let file_name = self.unique_name(record);
        let path = self.dir.join(&file_name);

        std::fs::create_dir_all(&self.dir).map_err(|source| ReportError::Write {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, bytes).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;

        self.used.insert(file_name.to_lowercase());
        debug!(path = %path.display(), "Report written");
        Ok(path)
    }

    fn unique_name(&self, record: &ScorecardRecord) -> String {
        let stem = report_stem(record);
        let extension = self.renderer.file_extension();

        let mut candidate = format!("{}.{}", stem, extension);
        let mut n = 2;
        while self.used.contains(&candidate.to_lowercase()) {
            candidate = format!("{}_{}.{}", stem, n, extension);
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchscore_domain::Score;

    fn named(name: &str) -> ScorecardRecord {
        ScorecardRecord {
            startup_name: name.to_string(),
            overall_score: Score::Rated(70.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_file_name_sanitizing() {
        assert_eq!(report_file_name(&named("Acme Rockets"), "md"), "Scorecard_Acme_Rockets.md");
        assert_eq!(report_file_name(&named("A/B: Labs?"), "json"), "Scorecard_A_B__Labs_.json");
        assert_eq!(report_file_name(&named("  "), "md"), "Scorecard_Unnamed.md");
    }

    #[test]
    fn test_json_renderer() {
        let bytes = JsonRenderer.render(&named("Acme")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["startup_name"], "Acme");
        assert_eq!(value["overall_score"], 70.0);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("Markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_any_renderer_extension() {
        assert_eq!(ReportFormat::Markdown.renderer(60).file_extension(), "md");
        assert_eq!(ReportFormat::Json.renderer(60).file_extension(), "json");
    }
}

//! Markdown scorecard report

use crate::error::ReportError;
use pitchscore_domain::{CriteriaMatrix, Renderer, ScorecardRecord};
use tabled::{builder::Builder, settings::Style};

/// Default wrap width for rationale cells
pub const DEFAULT_WRAP_WIDTH: usize = 60;

const EMPTY_SECTION: &str = "_Not provided._";

/// Renders a record as a Markdown document with tables
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    wrap_width: usize,
}

impl MarkdownRenderer {
    /// Create a renderer; a wrap width of 0 disables wrapping
    pub fn new(wrap_width: usize) -> Self {
        Self { wrap_width }
    }

    /// Render the report to a string
    pub fn render_to_string(&self, record: &ScorecardRecord) -> String {
        let mut out = String::new();

        let name = if record.startup_name.is_empty() {
            "Unnamed Startup"
        } else {
            record.startup_name.as_str()
        };
        out.push_str(&format!("# Deep-Dive Scorecard: {}\n\n", name));
        if record.overall_score.is_rated() {
            out.push_str(&format!("## Overall Score: {}/100\n\n", record.overall_score));
        } else {
            out.push_str("## Overall Score: N/A\n\n");
        }

        section(&mut out, "Executive Summary", &bullets(&record.executive_summary));
        section(
            &mut out,
            "Sector",
            &if record.sector.is_empty() {
                String::new()
            } else {
                record.sector.clone()
            },
        );
        section(&mut out, "Sector Analysis (India)", &bullets(&record.sector_analysis));

        let benchmark: Vec<String> = record
            .benchmark
            .iter()
            .map(|b| format!("**{}**: {}", b.label, b.value))
            .collect();
        section(&mut out, "Tracxn-Style Benchmark", &bullets(&benchmark));

        let [pmf, gtm, ops, model, founders] = record.scored_sections();
        for (title, matrix) in [pmf, gtm, ops, model] {
            let table = self.criteria_table(["Parameter", "Score (/100)", "Reason"], matrix);
            section(&mut out, title, &table);
        }
        let founders_table = self.criteria_table(["Criteria", "Score", "Assessment"], founders.1);
        section(&mut out, founders.0, &founders_table);

        let competitors = self.table(
            ["Name", "USP", "Business Model Alignment"],
            record
                .competitors
                .iter()
                .map(|c| [c.name.clone(), c.usp.clone(), c.alignment.clone()]),
        );
        section(&mut out, "Competitive Landscape", &competitors);

        let risks = self.table(
            ["Category", "Risk Score", "Rationale"],
            record
                .risks
                .iter()
                .map(|r| [r.category.clone(), r.score.to_string(), r.rationale.clone()]),
        );
        section(&mut out, "Uncertainty Analysis", &risks);

        section(&mut out, "Exit Options", &bullets(&record.exit_options));
        section(&mut out, "Comments", &bullets(&record.comments));

        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }

    fn criteria_table(&self, header: [&str; 3], matrix: &CriteriaMatrix) -> String {
        self.table(
            header,
            matrix
                .iter()
                .map(|c| [c.label.clone(), c.score.to_string(), c.rationale.join(" ")]),
        )
    }

    /// A three-column Markdown table; the last column is wrapped with
    /// `<br>` so every record stays on one table row
    fn table<I>(&self, header: [&str; 3], rows: I) -> String
    where
        I: Iterator<Item = [String; 3]>,
    {
        let mut builder = Builder::default();
        builder.push_record(header);

        let mut count = 0;
        for [first, second, third] in rows {
            builder.push_record([
                cell_text(&first),
                cell_text(&second),
                wrap_words(&cell_text(&third), self.wrap_width),
            ]);
            count += 1;
        }
        if count == 0 {
            return String::new();
        }

        let mut table = builder.build();
        table.with(Style::markdown());
        table.to_string()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH)
    }
}

impl Renderer for MarkdownRenderer {
    type Error = ReportError;

    fn render(&self, record: &ScorecardRecord) -> Result<Vec<u8>, ReportError> {
        Ok(self.render_to_string(record).into_bytes())
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }
}

/// Single-line cell content with table delimiters escaped
fn cell_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

/// Break text at word boundaries into lines of at most `width` characters,
/// joined by `<br>`. Words longer than `width` get a line of their own.
fn wrap_words(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("<br>")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str("### ");
    out.push_str(title);
    out.push_str("\n\n");
    out.push_str(if body.trim().is_empty() { EMPTY_SECTION } else { body });
    out.push_str("\n\n");
}

//! The scorecard record - the validated output of the pipeline

use crate::score::Score;
use serde::{Deserialize, Serialize};

/// A labeled sub-criterion with its score and rationale
///
/// This is the explicit (score, rationale) pair; raw model output that uses a
/// bare two-element list is converted into this shape at the parsing
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCriterion {
    /// Criterion label (e.g. "Market Size")
    pub label: String,

    /// Score on the 0-100 scale
    pub score: Score,

    /// Rationale lines
    pub rationale: Vec<String>,
}

impl ScoredCriterion {
    /// Create a new criterion
    pub fn new(label: impl Into<String>, score: Score, rationale: Vec<String>) -> Self {
        Self {
            label: label.into(),
            score,
            rationale,
        }
    }
}

/// A multi-criterion scoring section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaMatrix(pub Vec<ScoredCriterion>);

impl CriteriaMatrix {
    /// Iterate over criteria
    pub fn iter(&self) -> impl Iterator<Item = &ScoredCriterion> {
        self.0.iter()
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the section holds no criteria
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric leaf scores of this section, skipping unrated criteria
    pub fn rated_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().filter_map(|c| c.score.value())
    }
}

impl FromIterator<ScoredCriterion> for CriteriaMatrix {
    fn from_iter<T: IntoIterator<Item = ScoredCriterion>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One label/value row of the benchmark section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Metric label
    pub label: String,
    /// Metric value as reported
    pub value: String,
}

/// A competitor row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompetitorEntry {
    /// Competitor name
    pub name: String,
    /// Unique selling proposition
    pub usp: String,
    /// How the competitor's business model aligns with the startup's
    pub alignment: String,
}

/// A risk row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Risk category
    pub category: String,
    /// Risk score on the 0-100 scale
    pub score: Score,
    /// Rationale for the score
    pub rationale: String,
}

/// The validated structured output of the pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScorecardRecord {
    /// Identifying name of the startup
    pub startup_name: String,

    /// Overall score, either from the model or derived from section scores
    pub overall_score: Score,

    /// Executive summary bullets
    pub executive_summary: Vec<String>,

    /// Sector name
    pub sector: String,

    /// Sector analysis bullets
    pub sector_analysis: Vec<String>,

    /// Benchmark label/value rows
    pub benchmark: Vec<BenchmarkEntry>,

    /// Product-market fit criteria
    pub product_market_fit: CriteriaMatrix,

    /// Go-to-market execution criteria
    pub gtm_execution: CriteriaMatrix,

    /// Supply chain and operations criteria
    pub supply_chain_ops: CriteriaMatrix,

    /// Business model criteria
    pub business_model: CriteriaMatrix,

    /// Founders evaluation criteria
    pub founders: CriteriaMatrix,

    /// Exit option bullets
    pub exit_options: Vec<String>,

    /// Free-form comments
    pub comments: Vec<String>,

    /// Competitor table
    pub competitors: Vec<CompetitorEntry>,

    /// Risk table
    pub risks: Vec<RiskEntry>,
}

impl ScorecardRecord {
    /// The five scored sections in canonical order, with display titles
    pub fn scored_sections(&self) -> [(&'static str, &CriteriaMatrix); 5] {
        [
            ("Product Market Fit", &self.product_market_fit),
            ("GTM Execution", &self.gtm_execution),
            ("Supply Chain & Ops", &self.supply_chain_ops),
            ("Business Model", &self.business_model),
            ("Founders Evaluation", &self.founders),
        ]
    }

    /// Every leaf score in the record (criteria and risks)
    pub fn all_scores(&self) -> Vec<Score> {
        let mut scores = vec![self.overall_score];
        for (_, matrix) in self.scored_sections() {
            scores.extend(matrix.iter().map(|c| c.score));
        }
        scores.extend(self.risks.iter().map(|r| r.score));
        scores
    }
}

//! The required-field contract for scorecard documents
//!
//! The set of required top-level keys is an immutable value that is handed
//! to the validator, so several schema versions can be used side by side.

/// Top-level key names of the scorecard document
pub mod keys {
    /// Startup name
    pub const STARTUP_NAME: &str = "StartupName";
    /// Overall score (0-100)
    pub const OVERALL_SCORE: &str = "OverallScore";
    /// Executive summary bullets
    pub const EXECUTIVE_SUMMARY: &str = "ExecutiveSummary";
    /// Sector name
    pub const SECTOR: &str = "Sector";
    /// Sector analysis bullets (Indian market)
    pub const SECTOR_ANALYSIS_INDIA: &str = "SectorAnalysisIndia";
    /// Tracxn-style benchmark key/value pairs
    pub const TRACXN_STYLE_BENCHMARK: &str = "TracxnStyleBenchmark";
    /// Product-market fit criteria
    pub const PRODUCT_MARKET_FIT: &str = "ProductMarketFit";
    /// Go-to-market execution criteria
    pub const GTM_EXECUTION: &str = "GTMExecution";
    /// Supply chain and operations criteria
    pub const SUPPLY_CHAIN_OPS: &str = "SupplyChainOps";
    /// Business model criteria
    pub const BUSINESS_MODEL: &str = "BusinessModel";
    /// Founders evaluation criteria
    pub const FOUNDERS_EVALUATION: &str = "FoundersEvaluation";
    /// Exit option bullets
    pub const EXIT_OPTIONS: &str = "ExitOptions";
    /// Free-form comments
    pub const COMMENTS: &str = "Comments";
    /// Competitor entries
    pub const COMPETITIVE_LANDSCAPE: &str = "CompetitiveLandscape";
    /// Risk entries
    pub const UNCERTAINTY_ANALYSIS: &str = "UncertaintyAnalysis";
}

/// Shape expected for a top-level section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// A single string
    Text,
    /// A single number on the 0-100 scale
    Score,
    /// A list of free-text strings
    TextList,
    /// A mapping of labels to plain values
    KeyValue,
    /// A mapping of labeled sub-criteria to (score, rationale) pairs
    CriteriaMatrix,
    /// A list of competitor entries
    Competitors,
    /// A list of risk entries
    Risks,
}

/// Immutable set of required top-level keys, each with its expected shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields {
    name: String,
    fields: Vec<(String, SectionKind)>,
}

impl RequiredFields {
    /// Build a custom field set
    pub fn new<I, K>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SectionKind)>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(|(k, kind)| (k.into(), kind)).collect(),
        }
    }

    /// The full 15-key scorecard contract
    ///
    /// # Examples
    ///
    /// ```
    /// use pitchscore_domain::RequiredFields;
    ///
    /// let fields = RequiredFields::scorecard_v1();
    /// assert_eq!(fields.len(), 15);
    /// assert!(fields.contains("StartupName"));
    /// ```
    pub fn scorecard_v1() -> Self {
        use keys::*;
        Self::new(
            "scorecard-v1",
            [
                (STARTUP_NAME, SectionKind::Text),
                (OVERALL_SCORE, SectionKind::Score),
                (EXECUTIVE_SUMMARY, SectionKind::TextList),
                (SECTOR, SectionKind::Text),
                (SECTOR_ANALYSIS_INDIA, SectionKind::TextList),
                (TRACXN_STYLE_BENCHMARK, SectionKind::KeyValue),
                (PRODUCT_MARKET_FIT, SectionKind::CriteriaMatrix),
                (GTM_EXECUTION, SectionKind::CriteriaMatrix),
                (SUPPLY_CHAIN_OPS, SectionKind::CriteriaMatrix),
                (BUSINESS_MODEL, SectionKind::CriteriaMatrix),
                (FOUNDERS_EVALUATION, SectionKind::CriteriaMatrix),
                (EXIT_OPTIONS, SectionKind::TextList),
                (COMMENTS, SectionKind::TextList),
                (COMPETITIVE_LANDSCAPE, SectionKind::Competitors),
                (UNCERTAINTY_ANALYSIS, SectionKind::Risks),
            ],
        )
    }

    /// 13-key variant without the regional analysis and benchmark sections
    pub fn scorecard_compact() -> Self {
        let mut fields = Self::scorecard_v1();
        fields.name = "scorecard-compact".to_string();
        fields.fields.retain(|(k, _)| {
            k != keys::SECTOR_ANALYSIS_INDIA && k != keys::TRACXN_STYLE_BENCHMARK
        });
        fields
    }

    /// Name of this field set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of required keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no keys are required
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check whether a key is required
    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Iterate over required keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over (key, expected shape) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, SectionKind)> {
        self.fields.iter().map(|(k, kind)| (k.as_str(), *kind))
    }

    /// Required keys for which `present` returns false
    pub fn missing<F>(&self, present: F) -> Vec<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.keys().filter(|k| !present(k)).collect()
    }
}

impl Default for RequiredFields {
    fn default() -> Self {
        Self::scorecard_v1()
    }
}

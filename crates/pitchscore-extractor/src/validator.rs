//! Required-field validation of parsed scorecard documents

use crate::error::ExtractorError;
use crate::record::{find_key, score_number};
use pitchscore_domain::{RequiredFields, Score, SectionKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// How deeply a parsed document is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every required key exists at the top level
    Presence,

    /// Presence plus shape and score-range checks
    #[default]
    Strict,
}

/// Checks parsed documents against an injected [`RequiredFields`] set
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    fields: Arc<RequiredFields>,
    mode: ValidationMode,
}

impl SchemaValidator {
    /// Create a validator for a field set
    pub fn new(fields: Arc<RequiredFields>, mode: ValidationMode) -> Self {
        Self { fields, mode }
    }

    /// Presence-only validator
    pub fn presence(fields: Arc<RequiredFields>) -> Self {
        Self::new(fields, ValidationMode::Presence)
    }

    /// Presence plus shape checks
    pub fn strict(fields: Arc<RequiredFields>) -> Self {
        Self::new(fields, ValidationMode::Strict)
    }

    /// The required fields in use
    pub fn fields(&self) -> &RequiredFields {
        &self.fields
    }

    /// The validation mode
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate a document, returning every problem found
    pub fn validate(&self, doc: &Value) -> Result<(), ExtractorError> {
        let problems = self.check(doc);
        if problems.is_empty() {
            Ok(())
        } else {
            debug!(problems = problems.len(), schema = self.fields.name(), "Validation failed");
            Err(ExtractorError::Validation(problems))
        }
    }

    /// List the problems with a document; empty means valid
    pub fn check(&self, doc: &Value) -> Vec<String> {
        let Some(obj) = doc.as_object() else {
            return vec!["top-level value is not a JSON object".to_string()];
        };

        let mut problems: Vec<String> = self
            .fields
            .missing(|key| find_key(obj, key).is_some())
            .into_iter()
            .map(|key| format!("missing required field '{}'", key))
            .collect();

        if self.mode == ValidationMode::Strict {
            for (key, kind) in self.fields.iter() {
                if let Some(value) = find_key(obj, key) {
                    check_shape(key, kind, value, &mut problems);
                }
            }
        }
        problems
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::strict(Arc::new(RequiredFields::default()))
    }
}

fn check_shape(key: &str, kind: SectionKind, value: &Value, problems: &mut Vec<String>) {
    match kind {
        SectionKind::Text => {
            if !value.is_string() {
                problems.push(format!("'{}' must be a string", key));
            }
        }
        SectionKind::Score => check_score(key, value, problems),
        SectionKind::TextList => {
            if !value.is_array() {
                problems.push(format!("'{}' must be a list", key));
            }
        }
        SectionKind::KeyValue => {
            if !value.is_object() {
                problems.push(format!("'{}' must be an object of label/value pairs", key));
            }
        }
        SectionKind::CriteriaMatrix => check_matrix(key, value, problems),
        SectionKind::Competitors => {
            if !is_list_of_objects(value) {
                problems.push(format!("'{}' must be a list of objects", key));
            }
        }
        SectionKind::Risks => {
            let Some(rows) = value.as_array().filter(|_| is_list_of_objects(value)) else {
                problems.push(format!("'{}' must be a list of objects", key));
                return;
            };
            for (idx, row) in rows.iter().enumerate() {
                let score = row
                    .as_object()
                    .and_then(|o| find_key(o, "RiskScore").or_else(|| find_key(o, "Score")));
                if let Some(score) = score {
                    check_score(&format!("{}[{}].RiskScore", key, idx), score, problems);
                }
            }
        }
    }
}

/// Null and unparseable strings ("N/A", "unknown") are unrated scores and
/// pass; only numbers off the 0-100 scale and non-scalar values fail.
fn check_score(path: &str, value: &Value, problems: &mut Vec<String>) {
    match (value, score_number(value)) {
        (_, Some(n)) if !Score::in_range(n) => {
            problems.push(format!("'{}' is {} but must be between 0 and 100", path, n));
        }
        (_, Some(_)) | (Value::Null, None) | (Value::String(_), None) => {}
        (_, None) => problems.push(format!("'{}' must be a number", path)),
    }
}

fn check_matrix(key: &str, value: &Value, problems: &mut Vec<String>) {
    let Some(criteria) = value.as_object() else {
        problems.push(format!("'{}' must be an object of scored criteria", key));
        return;
    };

    for (label, entry) in criteria {
        let path = format!("{}.{}", key, label);
        match entry {
            Value::Object(fields) => {
                if let Some(score) = find_key(fields, "Score") {
                    check_score(&format!("{}.Score", path), score, problems);
                }
            }
            // Legacy [score, rationale] pair
            Value::Array(pair) => match pair.first() {
                Some(score) => check_score(&format!("{}[0]", path), score, problems),
                None => problems.push(format!("'{}' is an empty list", path)),
            },
            _ => problems.push(format!("'{}' must be a (score, rationale) entry", path)),
        }
    }
}

fn is_list_of_objects(value: &Value) -> bool {
    value
        .as_array()
        .map(|items| items.iter().all(Value::is_object))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "StartupName": "Acme",
            "OverallScore": 78,
            "ExecutiveSummary": ["Strong team"],
            "Sector": "Fintech",
            "SectorAnalysisIndia": ["UPI adoption"],
            "TracxnStyleBenchmark": {"Stage": "Seed"},
            "ProductMarketFit": {"Market Size": {"Score": 80, "Rationale": ["Large TAM"]}},
            "GTMExecution": {"Channels": [70, "Partnerships"]},
            "SupplyChainOps": {"Logistics": {"Score": "65/100", "Rationale": ["Asset light"]}},
            "BusinessModel": {"Margins": {"Score": 72, "Rationale": ["SaaS"]}},
            "FoundersEvaluation": {"Domain Expertise": {"Score": 90, "Assessment": "Ex-bankers"}},
            "ExitOptions": ["Acquisition"],
            "Comments": ["Watch burn"],
            "CompetitiveLandscape": [{"Name": "Rival", "USP": "Cheap", "BusinessModelAlignment": "High"}],
            "UncertaintyAnalysis": [{"Category": "Regulatory", "RiskScore": 40, "Rationale": "RBI"}]
        })
    }

    #[test]
    fn test_complete_document_passes_both_modes() {
        let fields = Arc::new(RequiredFields::scorecard_v1());
        let doc = sample_document();
        assert!(SchemaValidator::presence(fields.clone()).validate(&doc).is_ok());
        assert!(SchemaValidator::strict(fields).validate(&doc).is_ok());
    }

    #[test]
    fn test_missing_keys_are_listed() {
        let mut doc = sample_document();
        let obj = doc.as_object_mut().unwrap();
        obj.remove("Sector");
        obj.remove("Comments");

        let problems = SchemaValidator::default().check(&doc);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("'Sector'")));
        assert!(problems.iter().any(|p| p.contains("'Comments'")));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let problems = SchemaValidator::default().check(&json!([1, 2, 3]));
        assert_eq!(problems, vec!["top-level value is not a JSON object".to_string()]);
    }

    #[test]
    fn test_presence_ignores_shapes() {
        let mut doc = sample_document();
        doc["OverallScore"] = json!(true);
        doc["ExecutiveSummary"] = json!(42);

        let fields = Arc::new(RequiredFields::scorecard_v1());
        assert!(SchemaValidator::presence(fields.clone()).validate(&doc).is_ok());

        let problems = SchemaValidator::strict(fields).check(&doc);
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_strict_rejects_out_of_range_leaf_score() {
        let mut doc = sample_document();
        doc["ProductMarketFit"]["Market Size"]["Score"] = json!(140);
        doc["UncertaintyAnalysis"][0]["RiskScore"] = json!(-5);

        let err = SchemaValidator::default().validate(&doc).unwrap_err();
        match err {
            ExtractorError::Validation(problems) => {
                assert_eq!(problems.len(), 2);
                assert!(problems[0].contains("ProductMarketFit.Market Size.Score"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_accepts_unrated_scores() {
        let mut doc = sample_document();
        doc["OverallScore"] = json!(null);
        doc["ProductMarketFit"]["Market Size"]["Score"] = json!("N/A");
        doc["GTMExecution"]["Channels"] = json!(["unknown", "Too early to tell"]);
        doc["UncertaintyAnalysis"][0]["RiskScore"] = json!(null);

        assert!(SchemaValidator::default().validate(&doc).is_ok());
    }

    #[test]
    fn test_strict_rejects_out_of_range_numeric_string() {
        let mut doc = sample_document();
        doc["SupplyChainOps"]["Logistics"]["Score"] = json!("150");
        doc["BusinessModel"]["Margins"]["Score"] = json!([72]);

        let problems = SchemaValidator::default().check(&doc);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("SupplyChainOps.Logistics.Score' is 150"));
        assert!(problems[1].contains("BusinessModel.Margins.Score' must be a number"));
    }

    #[test]
    fn test_strict_rejects_malformed_matrix() {
        let mut doc = sample_document();
        doc["GTMExecution"] = json!(["Channels", 70]);
        let problems = SchemaValidator::default().check(&doc);
        assert!(problems[0].contains("'GTMExecution' must be an object"));
    }

    #[test]
    fn test_case_variant_keys_are_accepted() {
        let mut doc = sample_document();
        let obj = doc.as_object_mut().unwrap();
        let value = obj.remove("StartupName").unwrap();
        obj.insert("startup_name".to_string(), value);
        assert!(SchemaValidator::default().validate(&doc).is_ok());
    }

    #[test]
    fn test_custom_field_set() {
        let fields = Arc::new(RequiredFields::new("tiny", [("Sector", SectionKind::Text)]));
        let validator = SchemaValidator::strict(fields);
        assert!(validator.validate(&json!({"Sector": "Agritech"})).is_ok());
        assert!(validator.validate(&json!({})).is_err());
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_string(&ValidationMode::Strict).unwrap(), "\"strict\"");
        let mode: ValidationMode = serde_json::from_str("\"presence\"").unwrap();
        assert_eq!(mode, ValidationMode::Presence);
    }
}

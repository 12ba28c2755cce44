//! Conversion of a validated document tree into a typed [`ScorecardRecord`]
//!
//! Model output drifts in small ways between runs: key casing changes
//! (`GTMExecution` vs `gtm_execution`), scores arrive as `"85/100"` or
//! `"85%"`, founders entries carry an `Assessment` instead of a
//! `Rationale`, and older prompts produced bare `[score, rationale]` pairs.
//! The conversion here accepts all of these; anything it cannot read falls
//! back to an empty value or [`Score::Unrated`].

use pitchscore_domain::schema::keys;
use pitchscore_domain::{
    BenchmarkEntry, CompetitorEntry, CriteriaMatrix, RiskEntry, Score, ScoredCriterion,
    ScorecardRecord,
};
use serde_json::{Map, Value};

/// Lowercase alphanumerics only, so `GTM Execution` matches `gtm_execution`
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a key exactly, then ignoring case and separators
pub(crate) fn find_key<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = obj.get(key) {
        return Some(value);
    }
    let wanted = normalize_key(key);
    obj.iter()
        .find(|(k, _)| normalize_key(k) == wanted)
        .map(|(_, v)| v)
}

fn find_any<'a>(obj: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|key| find_key(obj, key))
}

/// Read a number from a JSON number or a numeric string
///
/// Accepts `85`, `"85"`, `"85%"`, `"85/100"` and `"8.5/10"` (scaled to 100).
pub(crate) fn score_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if let Some((num, den)) = s.split_once('/') {
                let num: f64 = num.trim().parse().ok()?;
                let den: f64 = den.trim().parse().ok()?;
                if den > 0.0 {
                    return Some(num / den * 100.0);
                }
                return None;
            }
            s.trim_end_matches('%').trim().parse().ok()
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn score_of(value: Option<&Value>) -> Score {
    value
        .and_then(score_number)
        .map(Score::new)
        .unwrap_or(Score::Unrated)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            let text = text_of(other);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }
    }
}

fn criterion(label: &str, value: &Value) -> ScoredCriterion {
    match value {
        Value::Object(fields) => ScoredCriterion::new(
            label,
            score_of(find_any(fields, &["Score", "Rating"])),
            find_any(fields, &["Rationale", "Assessment", "Reason", "Reasons", "Comment"])
                .map(text_list)
                .unwrap_or_default(),
        ),
        Value::Array(pair) => {
            let rationale = pair.iter().skip(1).flat_map(text_list).collect();
            ScoredCriterion::new(label, score_of(pair.first()), rationale)
        }
        other => ScoredCriterion::new(label, score_of(Some(other)), Vec::new()),
    }
}

fn matrix(value: Option<&Value>) -> CriteriaMatrix {
    match value {
        Some(Value::Object(criteria)) => criteria
            .iter()
            .map(|(label, entry)| criterion(label, entry))
            .collect(),
        // [{"Parameter": "Market Size", "Score": 80, ...}, ...]
        Some(Value::Array(rows)) => rows
            .iter()
            .filter_map(|row| {
                let fields = row.as_object()?;
                let label = find_any(fields, &["Parameter", "Criteria", "Criterion", "Name", "Label"])
                    .map(text_of)
                    .unwrap_or_default();
                Some(criterion(&label, row))
            })
            .collect(),
        _ => CriteriaMatrix::default(),
    }
}

fn benchmark(value: Option<&Value>) -> Vec<BenchmarkEntry> {
    let entry = |label: &str, value: &Value| BenchmarkEntry {
        label: label.trim().to_string(),
        value: text_of(value),
    };

    match value {
        Some(Value::Object(pairs)) => pairs.iter().map(|(k, v)| entry(k, v)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(pairs) => pairs.iter().map(|(k, v)| entry(k, v)).collect::<Vec<_>>(),
                other => {
                    let line = text_of(other);
                    match line.split_once(':') {
                        Some((label, rest)) => vec![BenchmarkEntry {
                            label: label.trim().to_string(),
                            value: rest.trim().to_string(),
                        }],
                        None => vec![BenchmarkEntry {
                            label: line,
                            value: String::new(),
                        }],
                    }
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn competitor(name: Option<&str>, fields: &Map<String, Value>) -> CompetitorEntry {
    let field = |candidates: &[&str]| find_any(fields, candidates).map(text_of).unwrap_or_default();
    CompetitorEntry {
        name: name
            .map(str::to_string)
            .unwrap_or_else(|| field(&["Name", "Competitor", "Company"])),
        usp: field(&["USP", "UniqueSellingProposition", "Differentiator"]),
        alignment: field(&["BusinessModelAlignment", "Alignment", "BusinessModel"]),
    }
}

fn competitors(value: Option<&Value>) -> Vec<CompetitorEntry> {
    match value {
        Some(Value::Array(rows)) => rows
            .iter()
            .filter_map(|row| row.as_object().map(|fields| competitor(None, fields)))
            .collect(),
        // {"Rival": {"USP": ..., ...}}
        Some(Value::Object(by_name)) => by_name
            .iter()
            .map(|(name, row)| match row.as_object() {
                Some(fields) => competitor(Some(name), fields),
                None => CompetitorEntry {
                    name: name.clone(),
                    usp: text_of(row),
                    ..Default::default()
                },
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn risks(value: Option<&Value>) -> Vec<RiskEntry> {
    let Some(Value::Array(rows)) = value else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let fields = row.as_object()?;
            Some(RiskEntry {
                category: find_any(fields, &["Category", "Risk", "Name"])
                    .map(text_of)
                    .unwrap_or_default(),
                score: score_of(find_any(fields, &["RiskScore", "Score"])),
                rationale: find_any(fields, &["Rationale", "Reason", "Assessment"])
                    .map(text_of)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Convert a parsed scorecard document into a typed record
///
/// Never fails: a non-object input yields an empty record.
pub fn to_record(doc: &Value) -> ScorecardRecord {
    let Some(obj) = doc.as_object() else {
        return ScorecardRecord::default();
    };
    let get = |key: &str| find_key(obj, key);
    let list = |key: &str| get(key).map(text_list).unwrap_or_default();

    ScorecardRecord {
        startup_name: get(keys::STARTUP_NAME).map(text_of).unwrap_or_default(),
        overall_score: score_of(get(keys::OVERALL_SCORE)),
        executive_summary: list(keys::EXECUTIVE_SUMMARY),
        sector: get(keys::SECTOR).map(text_of).unwrap_or_default(),
        sector_analysis: list(keys::SECTOR_ANALYSIS_INDIA),
        benchmark: benchmark(get(keys::TRACXN_STYLE_BENCHMARK)),
        product_market_fit: matrix(get(keys::PRODUCT_MARKET_FIT)),
        gtm_execution: matrix(get(keys::GTM_EXECUTION)),
        supply_chain_ops: matrix(get(keys::SUPPLY_CHAIN_OPS)),
        business_model: matrix(get(keys::BUSINESS_MODEL)),
        founders: matrix(get(keys::FOUNDERS_EVALUATION)),
        exit_options: list(keys::EXIT_OPTIONS),
        comments: list(keys::COMMENTS),
        competitors: competitors(get(keys::COMPETITIVE_LANDSCAPE)),
        risks: risks(get(keys::UNCERTAINTY_ANALYSIS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_number_formats() {
        assert_eq!(score_number(&json!(85)), Some(85.0));
        assert_eq!(score_number(&json!(72.5)), Some(72.5));
        assert_eq!(score_number(&json!("85")), Some(85.0));
        assert_eq!(score_number(&json!(" 85% ")), Some(85.0));
        assert_eq!(score_number(&json!("85/100")), Some(85.0));
        assert_eq!(score_number(&json!("8/10")), Some(80.0));
        assert_eq!(score_number(&json!("8/0")), None);
        assert_eq!(score_number(&json!("high")), None);
        assert_eq!(score_number(&json!(null)), None);
    }

    #[test]
    fn test_find_key_variants() {
        let obj = json!({"gtm_execution": 1, "Startup Name": 2});
        let obj = obj.as_object().unwrap();
        assert_eq!(find_key(obj, "GTMExecution"), Some(&json!(1)));
        assert_eq!(find_key(obj, "StartupName"), Some(&json!(2)));
        assert_eq!(find_key(obj, "Sector"), None);
    }

    #[test]
    fn test_full_document_conversion() {
        let doc = json!({
            "StartupName": " Acme Rockets ",
            "OverallScore": "78/100",
            "ExecutiveSummary": ["Reusable boosters", ""],
            "Sector": "SpaceTech",
            "SectorAnalysisIndia": "ISRO partnerships",
            "TracxnStyleBenchmark": {"Stage": "Series A", "Funding": 12},
            "ProductMarketFit": {
                "Market Size": {"Score": 80, "Rationale": ["Large TAM", "Growing"]},
                "Timing": {"Score": "n/a", "Rationale": "Unclear"}
            },
            "GTMExecution": {"Channels": [70, "Gov contracts"]},
            "SupplyChainOps": [{"Parameter": "Vendors", "Score": "65%", "Reason": "Few suppliers"}],
            "BusinessModel": {},
            "FoundersEvaluation": {"Domain Expertise": {"Score": 90, "Assessment": "Ex-ISRO engineers"}},
            "ExitOptions": ["Strategic acquisition"],
            "Comments": [],
            "CompetitiveLandscape": [{"Name": "Skyroot", "USP": "Solid fuel", "Business Model Alignment": "High"}],
            "UncertaintyAnalysis": [{"Category": "Regulatory", "RiskScore": 40, "Rationale": ["Licensing", "Export"]}]
        });

        let record = to_record(&doc);

        assert_eq!(record.startup_name, "Acme Rockets");
        assert_eq!(record.overall_score, Score::Rated(78.0));
        assert_eq!(record.executive_summary, vec!["Reusable boosters"]);
        assert_eq!(record.sector_analysis, vec!["ISRO partnerships"]);
        assert_eq!(record.benchmark.len(), 2);
        assert_eq!(record.benchmark[0].label, "Stage");
        assert_eq!(record.benchmark[1].value, "12");

        let pmf: Vec<_> = record.product_market_fit.iter().collect();
        assert_eq!(pmf[0].label, "Market Size");
        assert_eq!(pmf[0].rationale, vec!["Large TAM", "Growing"]);
        assert_eq!(pmf[1].score, Score::Unrated);
        assert_eq!(pmf[1].rationale, vec!["Unclear"]);

        let gtm: Vec<_> = record.gtm_execution.iter().collect();
        assert_eq!(gtm[0].score, Score::Rated(70.0));
        assert_eq!(gtm[0].rationale, vec!["Gov contracts"]);

        let ops: Vec<_> = record.supply_chain_ops.iter().collect();
        assert_eq!(ops[0].label, "Vendors");
        assert_eq!(ops[0].score, Score::Rated(65.0));

        assert!(record.business_model.is_empty());

        let founders: Vec<_> = record.founders.iter().collect();
        assert_eq!(founders[0].rationale, vec!["Ex-ISRO engineers"]);

        assert_eq!(record.competitors[0].alignment, "High");
        assert_eq!(record.risks[0].score, Score::Rated(40.0));
        assert_eq!(record.risks[0].rationale, "Licensing; Export");
    }

    #[test]
    fn test_benchmark_from_lines() {
        let record = to_record(&json!({"TracxnStyleBenchmark": ["Stage: Seed", "Unlabeled"]}));
        assert_eq!(record.benchmark[0].label, "Stage");
        assert_eq!(record.benchmark[0].value, "Seed");
        assert_eq!(record.benchmark[1].label, "Unlabeled");
    }

    #[test]
    fn test_competitors_keyed_by_name() {
        let record = to_record(&json!({
            "CompetitiveLandscape": {"Rival": {"USP": "Cheap", "Alignment": "Low"}}
        }));
        assert_eq!(record.competitors[0].name, "Rival");
        assert_eq!(record.competitors[0].usp, "Cheap");
        assert_eq!(record.competitors[0].alignment, "Low");
    }

    #[test]
    fn test_scores_are_clamped() {
        let record = to_record(&json!({"OverallScore": 140}));
        assert_eq!(record.overall_score, Score::Rated(100.0));
    }

    #[test]
    fn test_non_object_gives_empty_record() {
        assert_eq!(to_record(&json!("text")), ScorecardRecord::default());
    }
}

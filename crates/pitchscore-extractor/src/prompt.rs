//! LLM prompt engineering for scorecard extraction

use crate::config::DEFAULT_MAX_PROMPT_CHARS;
use pitchscore_domain::schema::keys;
use pitchscore_domain::{RequiredFields, SectionKind};

/// Builds the scorecard prompt for one document
///
/// The result is a pure function of (text, schema, budget, strictness), so
/// the same prompt is reused for every attempt on a document.
pub struct PromptBuilder {
    text: String,
    schema: String,
    budget_chars: usize,
    strict: bool,
}

impl PromptBuilder {
    /// Create a new prompt builder with the full scorecard schema and the
    /// default budget
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            schema: schema_for(&RequiredFields::scorecard_v1()),
            budget_chars: DEFAULT_MAX_PROMPT_CHARS,
            strict: false,
        }
    }

    /// Embed a different example structure
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the maximum number of source characters kept
    pub fn with_budget(mut self, budget_chars: usize) -> Self {
        self.budget_chars = budget_chars;
        self
    }

    /// Also replace double quotes in the source text
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let source = sanitize(truncate_chars(&self.text, self.budget_chars), self.strict);

        let mut prompt = String::with_capacity(source.len() + self.schema.len() + 1024);

        // 1. Instruction and format specification
        prompt.push_str(INSTRUCTIONS);
        prompt.push('\n');
        prompt.push_str(self.schema.trim());
        prompt.push_str("\n\n");

        // 2. Output rules
        prompt.push_str(OUTPUT_RULES);
        prompt.push_str("\n\n");

        // 3. The text to analyze
        prompt.push_str("PITCH DECK:\n");
        prompt.push_str(&source);
        prompt.push('\n');

        prompt
    }
}

/// Keep at most `budget` characters; a hard cutoff, not sentence-aware
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Remove code-fence markers; in strict mode also swap `"` for `'`
pub fn sanitize(text: &str, strict: bool) -> String {
    let cleaned = text.replace("```", "").replace("~~~", "");
    if strict {
        cleaned.replace('"', "'")
    } else {
        cleaned
    }
}

const INSTRUCTIONS: &str = r#"You are an investment analyst. Read the pitch deck below and generate an investment scorecard for the startup.
Fill in this exact JSON structure (annotations show the expected type and range):"#;

const OUTPUT_RULES: &str = r#"Rules:
- Return ONLY a single valid JSON object. No markdown code blocks, no explanations before or after it.
- Use double quotes for every key and every string value.
- Every score is an integer from 0 to 100.
- Include every top-level key shown above, even when the deck says little about it."#;

/// Annotated example structure for a required-field set
///
/// Known scorecard sections get their exact layout; any other key gets a
/// generic example for its [`SectionKind`].
pub fn schema_for(fields: &RequiredFields) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|(key, kind)| format!("  \"{}\": {}", key, example_for(key, kind)))
        .collect();
    format!("{{\n{}\n}}", entries.join(",\n"))
}

fn example_for(key: &str, kind: SectionKind) -> &'static str {
    match (key, kind) {
        (keys::FOUNDERS_EVALUATION, SectionKind::CriteriaMatrix) => {
            r#"{"Criteria": {"Score": "int 0-100", "Assessment": "string"}}"#
        }
        (keys::COMPETITIVE_LANDSCAPE, SectionKind::Competitors) => {
            r#"[{"Name": "string", "USP": "string", "BusinessModelAlignment": "string"}]"#
        }
        (keys::UNCERTAINTY_ANALYSIS, SectionKind::Risks) => {
            r#"[{"Category": "string", "RiskScore": "int 0-100", "Rationale": "string"}]"#
        }
        (_, SectionKind::Text) => r#""string""#,
        (_, SectionKind::Score) => r#""int 0-100""#,
        (_, SectionKind::TextList) => r#"["string"]"#,
        (_, SectionKind::KeyValue) => r#"{"Key": "Value"}"#,
        (_, SectionKind::CriteriaMatrix) => r#"{"Parameter": {"Score": "int 0-100", "Rationale": ["string"]}}"#,
        (_, SectionKind::Competitors) => r#"[{"Name": "string", "USP": "string"}]"#,
        (_, SectionKind::Risks) => r#"[{"Category": "string", "RiskScore": "int 0-100", "Rationale": "string"}]"#,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Acme builds reusable rockets").build();
        assert!(prompt.contains("PITCH DECK:\nAcme builds reusable rockets"));
    }

    #[test]
    fn test_prompt_includes_schema_and_rules() {
        let prompt = PromptBuilder::new("deck").build();
        assert!(prompt.contains("\"StartupName\": \"string\""));
        assert!(prompt.contains("int 0-100"));
        assert!(prompt.contains("Return ONLY a single valid JSON object"));
        assert!(prompt.contains("double quotes"));
    }

    #[test]
    fn test_custom_schema() {
        let prompt = PromptBuilder::new("deck")
            .with_schema("{\"Name\": \"string\"}")
            .build();
        assert!(prompt.contains("{\"Name\": \"string\"}"));
        assert!(!prompt.contains("UncertaintyAnalysis"));
    }

    #[test]
    fn test_truncates_to_budget() {
        let text = "a".repeat(100);
        let prompt = PromptBuilder::new(text).with_budget(10).build();
        assert!(prompt.contains(&format!("PITCH DECK:\n{}\n", "a".repeat(10))));
        assert!(!prompt.contains(&"a".repeat(11)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_strips_code_fences() {
        let prompt = PromptBuilder::new("```json\n{\"x\": 1}\n```").build();
        let deck = prompt.split("PITCH DECK:\n").nth(1).unwrap();
        assert!(!deck.contains("```"));
        assert!(deck.contains("\"x\""));
    }

    #[test]
    fn test_strict_replaces_double_quotes() {
        let prompt = PromptBuilder::new("the \"best\" deck").strict(true).build();
        assert!(prompt.contains("the 'best' deck"));

        let prompt = PromptBuilder::new("the \"best\" deck").strict(false).build();
        assert!(prompt.contains("the \"best\" deck"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new("same input").with_budget(5);
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_schema_template_is_valid_json() {
        let fields = RequiredFields::scorecard_v1();
        let value: serde_json::Value = serde_json::from_str(&schema_for(&fields)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 15);
        for key in fields.keys() {
            assert!(obj.contains_key(key), "schema is missing {}", key);
        }
        assert_eq!(value["FoundersEvaluation"]["Criteria"]["Assessment"], "string");
        assert_eq!(value["UncertaintyAnalysis"][0]["RiskScore"], "int 0-100");
    }

    #[test]
    fn test_schema_follows_field_set() {
        let schema = schema_for(&RequiredFields::scorecard_compact());
        assert!(!schema.contains("SectorAnalysisIndia"));
        assert!(!schema.contains("TracxnStyleBenchmark"));
        assert!(schema.contains("\"UncertaintyAnalysis\""));

        let custom = RequiredFields::new(
            "custom",
            [("StartupName", SectionKind::Text), ("Moat", SectionKind::CriteriaMatrix)],
        );
        let value: serde_json::Value = serde_json::from_str(&schema_for(&custom)).unwrap();
        assert_eq!(value["Moat"]["Parameter"]["Score"], "int 0-100");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}

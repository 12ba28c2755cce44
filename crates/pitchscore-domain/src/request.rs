//! Extraction requests and run identifiers

use std::fmt;

/// Unique identifier for one pipeline run, based on UUIDv7
///
/// UUIDv7 ids sort chronologically, which keeps interleaved log lines from
/// concurrent batch runs easy to group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use pitchscore_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a RunId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid run id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Short form used in log lines and summaries (first 8 hex chars)
    pub fn short(&self) -> String {
        let full = self.to_string();
        full.chars().take(8).collect()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Request to turn one document's text into a scorecard
///
/// Immutable once created; one request drives every model call made for
/// the document.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Identifier for log correlation
    pub run_id: RunId,

    /// Human-readable source name (usually the file name)
    pub source_name: String,

    /// Plain text extracted from the document
    pub source_text: String,

    /// Maximum number of source characters embedded in the prompt
    pub model_budget_chars: usize,
}

impl ExtractionRequest {
    /// Create a request with a fresh run id
    pub fn new(
        source_name: impl Into<String>,
        source_text: impl Into<String>,
        model_budget_chars: usize,
    ) -> Self {
        Self {
            run_id: RunId::new(),
            source_name: source_name.into(),
            source_text: source_text.into(),
            model_budget_chars,
        }
    }

    /// True when the extracted text holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.source_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_display_and_parse() {
        let id = RunId::new();
        let id_str = id.to_string();
        assert_eq!(id_str.len(), 36);

        let parsed = RunId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_run_id_short() {
        let id = RunId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn test_run_id_invalid_string() {
        assert!(RunId::from_string("deck-001").is_err());
    }

    #[test]
    fn test_request_blank_detection() {
        let blank = ExtractionRequest::new("deck.pdf", " \n\t ", 28_000);
        assert!(blank.is_blank());

        let filled = ExtractionRequest::new("deck.pdf", "Acme builds rockets", 28_000);
        assert!(!filled.is_blank());
    }

    #[test]
    fn test_requests_get_distinct_run_ids() {
        let a = ExtractionRequest::new("a.pdf", "text", 10);
        let b = ExtractionRequest::new("b.pdf", "text", 10);
        assert_ne!(a.run_id, b.run_id);
    }
}

//! Document text extraction and whitespace normalization

use crate::error::ExtractorError;
use pitchscore_domain::TextExtractor;
use std::path::Path;

/// Normalize whitespace in extracted text
///
/// - non-breaking spaces become plain spaces
/// - form feeds (page breaks) and `\r\n` become `\n`
/// - trailing whitespace is trimmed from every line
/// - runs of blank lines collapse to a single blank line
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text
        .replace("\r\n", "\n")
        .replace(['\r', '\x0C'], "\n")
        .replace('\u{a0}', " ");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0usize;
    for line in unified.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}

/// Extracts text from PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    type Error = ExtractorError;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractorError> {
        // pdf-extract panics on some malformed inputs
        let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractorError::Document("PDF parser panicked on malformed input".to_string()))?;

        let text = result.map_err(|e| ExtractorError::Document(format!("PDF extraction failed: {}", e)))?;
        Ok(normalize_whitespace(&text))
    }
}

/// Treats the document as UTF-8 text (invalid sequences are replaced)
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    type Error = ExtractorError;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractorError> {
        Ok(normalize_whitespace(&String::from_utf8_lossy(bytes)))
    }
}

/// Extractor chosen from a document's file name
#[derive(Debug, Clone, Copy)]
pub enum DocumentExtractor {
    /// PDF documents
    Pdf(PdfTextExtractor),
    /// Anything else is read as text
    Plain(PlainTextExtractor),
}

impl DocumentExtractor {
    /// Pick an extractor by file extension (`.pdf` or plain text)
    pub fn for_name(name: &str) -> Self {
        let is_pdf = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            DocumentExtractor::Pdf(PdfTextExtractor)
        } else {
            DocumentExtractor::Plain(PlainTextExtractor)
        }
    }
}

impl TextExtractor for DocumentExtractor {
    type Error = ExtractorError;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractorError> {
        match self {
            DocumentExtractor::Pdf(x) => x.extract(bytes),
            DocumentExtractor::Plain(x) => x.extract(bytes),
        }
    }
}

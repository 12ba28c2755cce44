//! Document-level entry points and concurrent batch processing

use crate::error::ExtractorError;
use crate::orchestrator::{ExtractionOutcome, RetryOrchestrator};
use crate::text::DocumentExtractor;
use futures::stream::{self, StreamExt};
use pitchscore_domain::{ExtractionRequest, LlmProvider, TextExtractor};
use std::path::Path;
use tracing::{debug, info};

/// A named document awaiting analysis
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Display name, usually the file name
    pub name: String,
    /// Raw document bytes
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    /// Create a document from bytes
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ExtractorError::Document(format!("Cannot read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Result for one document of a batch
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Document name
    pub name: String,
    /// The run outcome, or why the document could not be run at all
    pub result: Result<ExtractionOutcome, ExtractorError>,
}

impl DocumentOutcome {
    /// The record, if one was produced
    pub fn record(&self) -> Option<&pitchscore_domain::ScorecardRecord> {
        self.result.as_ref().ok().and_then(|o| o.record.as_ref())
    }
}

/// Turns documents into scorecards, one independent run per document
pub struct ScorecardPipeline<L>
where
    L: LlmProvider,
{
    orchestrator: RetryOrchestrator<L>,
}

impl<L> ScorecardPipeline<L>
where
    L: LlmProvider,
{
    /// Create a pipeline around an orchestrator
    pub fn new(orchestrator: RetryOrchestrator<L>) -> Self {
        Self { orchestrator }
    }

    /// The orchestrator in use
    pub fn orchestrator(&self) -> &RetryOrchestrator<L> {
        &self.orchestrator
    }

    /// Analyze already-extracted text
    pub async fn analyze_text(
        &self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        let request = ExtractionRequest::new(name, text, self.orchestrator.config().max_prompt_chars);
        self.orchestrator.run(&request).await
    }

    /// Extract text from a document, then analyze it
    pub async fn analyze_document<E>(
        &self,
        name: impl Into<String>,
        bytes: &[u8],
        extractor: &E,
    ) -> Result<ExtractionOutcome, ExtractorError>
    where
        E: TextExtractor<Error = ExtractorError>,
    {
        let text = extractor.extract(bytes)?;
        self.analyze_text(name, text).await
    }

    /// Analyze a batch concurrently; results come back in input order
    pub async fn analyze_batch(&self, documents: Vec<SourceDocument>) -> Vec<DocumentOutcome> {
        self.analyze_batch_with(documents, |_, _| {}).await
    }

    /// Analyze a batch concurrently, calling `on_done` with the input index
    /// as each document finishes; results come back in input order
    pub async fn analyze_batch_with<F>(
        &self,
        documents: Vec<SourceDocument>,
        mut on_done: F,
    ) -> Vec<DocumentOutcome>
    where
        F: FnMut(usize, &DocumentOutcome),
    {
        let total = documents.len();
        let concurrency = self.orchestrator.config().max_concurrency.max(1);
        info!(documents = total, concurrency, "Starting batch");

        let mut runs = stream::iter(documents.into_iter().enumerate())
            .map(|(idx, doc)| async move { (idx, self.process_document(doc).await) })
            .buffer_unordered(concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some((idx, outcome)) = runs.next().await {
            debug!(document = %outcome.name, done = results.len() + 1, total, "Document finished");
            on_done(idx, &outcome);
            results.push((idx, outcome));
        }

        results.sort_by_key(|(idx, _)| *idx);
        let results: Vec<DocumentOutcome> = results.into_iter().map(|(_, o)| o).collect();

        let succeeded = results.iter().filter(|o| o.record().is_some()).count();
        info!(documents = total, succeeded, failed = total - succeeded, "Batch complete");
        results
    }

    async fn process_document(&self, doc: SourceDocument) -> DocumentOutcome {
        let name = doc.name.clone();
        let result = match extract_text(doc).await {
            Ok(text) => self.analyze_text(name.clone(), text).await,
            Err(e) => Err(e),
        };
        DocumentOutcome { name, result }
    }
}

/// PDF parsing is CPU-bound, so it runs on the blocking pool
async fn extract_text(doc: SourceDocument) -> Result<String, ExtractorError> {
    tokio::task::spawn_blocking(move || DocumentExtractor::for_name(&doc.name).extract(&doc.bytes))
        .await
        .map_err(|e| ExtractorError::Document(format!("Extraction task failed: {}", e)))?
}

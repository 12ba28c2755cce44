//! Analyze command implementation.

use super::SAMPLE_RESPONSE;
use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat, ProviderKind, API_KEY_ENV};
use crate::error::{CliError, Result};
use crate::output::{Formatter, SummaryRow};
use pitchscore_domain::{LlmProvider, RequiredFields};
use pitchscore_extractor::{
    DocumentOutcome, ExtractorConfig, RetryOrchestrator, SchemaValidator, ScorecardPipeline,
    SourceDocument,
};
use pitchscore_llm::{ollama, GeminiProvider, MockProvider, OllamaProvider};
use pitchscore_report::{AnyRenderer, ReportWriter};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Model used with Ollama when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Everything a batch needs besides the model client.
struct BatchJob<'a> {
    files: Vec<PathBuf>,
    extractor: ExtractorConfig,
    fields: RequiredFields,
    renderer: AnyRenderer,
    out_dir: PathBuf,
    show_raw: bool,
    formatter: &'a Formatter,
}

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extractor = extractor_config(&args, config)?;

    let job = BatchJob {
        files: args.files.clone(),
        extractor,
        fields: args.schema.into(),
        renderer: args
            .report
            .map(Into::into)
            .unwrap_or(config.settings.report)
            .renderer(config.settings.wrap_width),
        out_dir: args.out.clone().unwrap_or_else(|| config.settings.output_dir.clone()),
        show_raw: args.show_raw,
        formatter,
    };

    let kind: ProviderKind = args.provider.map(Into::into).unwrap_or(config.provider.kind);
    let model = args.model.clone().or_else(|| config.provider.model.clone());

    match kind {
        ProviderKind::Gemini => {
            let api_key = config.resolve_api_key(args.api_key.as_deref()).ok_or_else(|| {
                CliError::Config(format!(
                    "No Gemini API key. Pass --api-key, set provider.api_key or export {}",
                    API_KEY_ENV
                ))
            })?;
            let mut provider = GeminiProvider::new(api_key)?;
            if let Some(model) = model {
                provider = provider.with_model(model);
            }
            if let Some(endpoint) = &config.provider.endpoint {
                provider = provider.with_endpoint(endpoint.clone());
            }
            run_batch(provider, job).await
        }
        ProviderKind::Ollama => {
            let endpoint = config
                .provider
                .endpoint
                .clone()
                .unwrap_or_else(|| ollama::DEFAULT_ENDPOINT.to_string());
            let model = model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
            run_batch(OllamaProvider::new(endpoint, model)?, job).await
        }
        ProviderKind::Mock => run_batch(MockProvider::new(SAMPLE_RESPONSE), job).await,
    }
}

/// Configured extractor settings with command-line overrides applied.
fn extractor_config(args: &AnalyzeArgs, config: &Config) -> Result<ExtractorConfig> {
    let mut extractor = if args.lenient {
        ExtractorConfig::lenient()
    } else {
        config.extractor.clone()
    };

    if let Some(attempts) = args.attempts {
        extractor.max_attempts = attempts;
    }
    if let Some(timeout) = args.timeout {
        extractor.attempt_timeout_secs = timeout;
    }
    if args.derive_score {
        extractor.derive_overall_score = true;
    }

    extractor.validate().map_err(CliError::InvalidInput)?;
    Ok(extractor)
}

async fn run_batch<L>(provider: L, job: BatchJob<'_>) -> Result<()>
where
    L: LlmProvider,
{
    let validator = SchemaValidator::new(Arc::new(job.fields), job.extractor.validation_mode);
    let orchestrator = RetryOrchestrator::new(provider, job.extractor)?.with_validator(validator);

    if job.formatter.format() == OutputFormat::Table {
        eprintln!(
            "{}",
            job.formatter.info(&format!(
                "Analyzing {} document(s) with {}",
                job.files.len(),
                orchestrator.model_name()
            ))
        );
    }
    info!(documents = job.files.len(), model = orchestrator.model_name(), "Analyze started");

    let pipeline = ScorecardPipeline::new(orchestrator);

    let mut unreadable = Vec::new();
    let mut documents = Vec::new();
    for path in &job.files {
        match SourceDocument::from_path(path) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                unreadable.push(DocumentOutcome {
                    name: path.display().to_string(),
                    result: Err(e),
                });
            }
        }
    }

    // Reports are written as each document finishes, so a late failure
    // does not lose earlier results. Keyed by batch index: names repeat
    // across directories.
    let mut writer = ReportWriter::new(job.renderer, &job.out_dir);
    let mut written: HashMap<usize, std::result::Result<PathBuf, String>> = HashMap::new();
    let outcomes = pipeline
        .analyze_batch_with(documents, |idx, outcome| {
            if let Some(record) = outcome.record() {
                written.insert(idx, writer.write(record).map_err(|e| e.to_string()));
            }
        })
        .await;

    let mut rows: Vec<SummaryRow> = unreadable
        .iter()
        .map(|outcome| SummaryRow::from_outcome(outcome, None, None))
        .collect();

    for (idx, outcome) in outcomes.iter().enumerate() {
        let (report, report_error) = match written.remove(&idx) {
            Some(Ok(path)) => (Some(path), None),
            Some(Err(e)) => (None, Some(e)),
            None => (None, None),
        };
        rows.push(SummaryRow::from_outcome(outcome, report, report_error));

        if job.show_raw && outcome.record().is_none() {
            if let Ok(run) = &outcome.result {
                if let Some(raw) = &run.last_raw_response {
                    eprintln!("{}", job.formatter.warning(&format!("Last response for {}:", outcome.name)));
                    eprintln!("{}", raw);
                }
            }
        }
    }

    let output = job.formatter.format_summary(&rows)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    let failed = rows.iter().filter(|row| !row.success).count();
    if failed > 0 {
        return Err(CliError::DocumentsFailed {
            failed,
            total: rows.len(),
        });
    }
    Ok(())
}

//! CLI command definitions and argument parsing.

use crate::config::{OutputFormat, ProviderKind};
use clap::{ArgAction, Parser, Subcommand};
use pitchscore_domain::RequiredFields;
use pitchscore_report::ReportFormat;
use std::path::PathBuf;

/// pitchscore - Turn pitch decks into investment scorecards.
#[derive(Debug, Parser)]
#[command(name = "pitchscore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PITCHSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (report paths only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score one or more pitch decks and write reports
    Analyze(AnalyzeArgs),

    /// Print the prompt that would be sent for a document
    Prompt(PromptArgs),

    /// Repair, parse and validate a saved model response
    Repair(RepairArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Pitch deck files (PDF or text)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the generated reports
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub report: Option<ReportArg>,

    /// Model provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key for the Gemini provider (falls back to config, then GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model calls per document (1-5)
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Timeout per model call in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Replace the model's overall score with the mean of section scores
    #[arg(long)]
    pub derive_score: bool,

    /// Use the lenient preset (more attempts, presence-only validation)
    #[arg(long)]
    pub lenient: bool,

    /// Required-field set
    #[arg(long, value_enum, default_value = "v1")]
    pub schema: SchemaArg,

    /// Print the last raw model response for documents without a scorecard
    #[arg(long)]
    pub show_raw: bool,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Pitch deck file (PDF or text)
    pub file: PathBuf,

    /// Maximum source characters embedded in the prompt
    #[arg(long)]
    pub budget: Option<usize>,

    /// Required-field set the embedded example follows
    #[arg(long, value_enum, default_value = "v1")]
    pub schema: SchemaArg,
}

/// Arguments for the repair command.
#[derive(Debug, Parser)]
pub struct RepairArgs {
    /// File holding a raw model response (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Only check that required keys are present
    #[arg(long)]
    pub presence: bool,

    /// Replace the overall score with the mean of section scores
    #[arg(long)]
    pub derive_score: bool,

    /// Required-field set
    #[arg(long, value_enum, default_value = "v1")]
    pub schema: SchemaArg,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Provider argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini
    Gemini,
    /// Local Ollama server
    Ollama,
    /// Scripted mock (offline testing)
    Mock,
}

/// Report format argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportArg {
    /// Markdown with tables
    Markdown,
    /// Serialized record
    Json,
}

/// Required-field set argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaArg {
    /// All 15 sections
    V1,
    /// Without the regional analysis and benchmark sections
    Compact,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl From<ProviderArg> for ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Gemini => ProviderKind::Gemini,
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Mock => ProviderKind::Mock,
        }
    }
}

impl From<ReportArg> for ReportFormat {
    fn from(report: ReportArg) -> Self {
        match report {
            ReportArg::Markdown => ReportFormat::Markdown,
            ReportArg::Json => ReportFormat::Json,
        }
    }
}

impl From<SchemaArg> for RequiredFields {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::V1 => RequiredFields::scorecard_v1(),
            SchemaArg::Compact => RequiredFields::scorecard_compact(),
        }
    }
}

//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pitchscore_extractor::ExtractorConfig;
use pitchscore_report::{ReportFormat, DEFAULT_WRAP_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Model provider settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider to use
    #[serde(default)]
    pub kind: ProviderKind,

    /// Model name (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key (prefer the environment variable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Available model providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
    /// Canned responses, no network
    Mock,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Default report format
    #[serde(default)]
    pub report: ReportFormat,

    /// Directory reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Wrap width for table text in Markdown reports (0 disables)
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".pitchscore").join("config.toml"))
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("********".to_string());
        }
        config
    }

    /// Check the extractor settings.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)
    }

    /// API key from the flag, then the config file, then the environment.
    pub fn resolve_api_key(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.provider.api_key.clone())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            report: ReportFormat::Markdown,
            output_dir: default_output_dir(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_wrap_width() -> usize {
    DEFAULT_WRAP_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert!(config.settings.color);
        assert_eq!(config.settings.output_dir, PathBuf::from("reports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.provider.kind = ProviderKind::Ollama;
        config.provider.model = Some("llama3".to_string());
        config.extractor.max_attempts = 4;
        config.settings.report = ReportFormat::Json;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[provider]\nkind = \"mock\"\n\n[extractor]\nmax_attempts = 2\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Mock);
        assert_eq!(config.extractor.max_attempts, 2);
        assert_eq!(config.extractor.max_prompt_chars, 28_000);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_invalid_extractor_settings_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\nmax_attempts = 9\n").unwrap();

        assert!(matches!(Config::load(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = Config::default();
        config.provider.api_key = Some("from-file".to_string());

        assert_eq!(config.resolve_api_key(Some("from-flag")).as_deref(), Some("from-flag"));
        assert_eq!(config.resolve_api_key(None).as_deref(), Some("from-file"));
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = Config::default();
        config.provider.api_key = Some("secret".to_string());
        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("********"));
    }
}

//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub async fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", config.redacted().to_toml()?);
            if !path.exists() {
                eprintln!(
                    "{}",
                    formatter.info(&format!("{} does not exist; showing defaults", path.display()))
                );
            }
        }
        ConfigAction::Init { force } => {
            init_config(path, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", path.display()))
            );
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// Write a default configuration file, refusing to overwrite unless forced.
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pitchscore").join("config.toml");

        init_config(&path, false).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[provider]\nkind = \"mock\"\n").unwrap();

        assert!(matches!(init_config(&path, false), Err(CliError::Config(_))));
        assert!(fs::read_to_string(&path).unwrap().contains("mock"));

        init_config(&path, true).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("mock"));
    }
}

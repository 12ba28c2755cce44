//! Command implementations.

pub mod analyze;
pub mod config;
pub mod prompt;
pub mod repair;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::prompt::execute_prompt;
pub use self::repair::execute_repair;

/// Canned model reply used by the mock provider.
pub const SAMPLE_RESPONSE: &str = include_str!("../../assets/sample_scorecard.json");

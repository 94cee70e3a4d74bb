//! Command-line interface: argument parsing, configuration merging and
//! command execution.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::Settings;

/// Loads configuration for the CLI's environment and applies its overrides.
///
/// # Errors
/// Returns an error if loading, merging or validation fails.
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::load(cli.config.as_deref(), cli.environment())?;
    Ok(merger.merge_cli_args(cli)?)
}

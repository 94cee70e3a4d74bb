//! Merges CLI overrides into file and environment configuration.
//!
//! Precedence, lowest to highest: configuration files, `NOTIFY_*`
//! environment variables, global flags (`--verbose`/`--quiet`), then
//! `serve` arguments.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Environment, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration for `environment`.
    ///
    /// With `config_path` only that file is read; otherwise the layered
    /// configuration directory is used.
    ///
    /// # Errors
    /// Returns `ConfigError` if loading or validation fails.
    pub fn load(config_path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?.with_environment(environment);
        if let Some(path) = config_path {
            loader = loader.with_config_file(path);
        }
        Ok(Self::new(loader.load()?))
    }

    /// Applies CLI overrides and validates the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run: _,
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Command-level log level beats the global flags
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_merger_keeps_base_config() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["notification-service", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["notification-service", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&[
            "notification-service",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9090",
        ]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&[
            "notification-service",
            "--verbose",
            "serve",
            "--log-level",
            "warn",
        ]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merge_revalidates_telegram() {
        let mut base = Settings::default();
        base.telegram.bot_token = "123:abc".to_string();
        let cli = Cli::try_parse_from(["notification-service"]).unwrap();

        let result = ConfigurationMerger::new(base).merge_cli_args(&cli);

        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "telegram.chat_id"
        ));
    }
}

//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};
use crate::server::Server;
use crate::services::notifications::build_providers;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Runs the server, or only checks the configuration when `dry_run` is set.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Provider construction errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config.clone(), self.environment)
            .run()
            .await
            .map_err(AppError::from)
    }

    /// Validates configuration and reports what the server would do.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        let providers = build_providers(&self.config.telegram)?;
        let names: Vec<_> = providers.iter().map(|p| p.name()).collect();

        println!("✓ Configuration is valid");
        println!("✓ Environment: {}", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Active providers: {}", names.join(", "));
        if !self.config.telegram.is_enabled() {
            println!("! Telegram disabled: no bot token configured");
        }
        println!("✓ Logger configuration is valid");

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_handler_new() {
        let config = Settings::default();
        let handler = ServeCommandHandler::new(config.clone(), Environment::Test);
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(Settings::default(), Environment::Test);
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_with_telegram_enabled() {
        let mut config = Settings::default();
        config.telegram.bot_token = "123:abc".to_string();
        config.telegram.chat_id = "-100200300".to_string();

        let handler = ServeCommandHandler::new(config, Environment::Test);
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = Settings::default();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config, Environment::Test);

        let result = handler.execute(true).await;
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}

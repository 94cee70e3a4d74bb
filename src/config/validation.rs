//! Configuration validation logic
//!
//! Each section validates its own ranges and formats; `Settings::validate`
//! runs them all and stops at the first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{LoggerSettings, ServerConfig, Settings, TelegramSettings};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    /// - Request and shutdown timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Use 0.0.0.0 to listen on all interfaces.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.shutdown_timeout == 0 {
            return Err(ConfigError::validation(
                "server.shutdown_timeout",
                "Shutdown timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl TelegramSettings {
    /// # Validation Rules
    /// - Nothing is checked while the provider is disabled (blank bot token)
    /// - An enabled provider needs a chat id
    /// - The API base URL must be http(s)
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_enabled() {
            return Ok(());
        }

        if self.chat_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "telegram.chat_id",
                "ChatId is required when a Telegram BotToken is configured.",
            ));
        }

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: "telegram.api_base_url".to_string(),
                message: format!(
                    "Invalid Telegram API base URL '{}'. Expected an http:// or https:// URL.",
                    self.api_base_url
                ),
            });
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "telegram.request_timeout",
                "Telegram request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.to_logger_config().map(|_| ())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.telegram.validate()?;
        Ok(())
    }
}

//! Assembles the fixed provider set from configuration.

use std::sync::Arc;

use super::dispatcher::NotificationDispatcher;
use super::logging_provider::LoggingProvider;
use super::provider::NotificationProvider;
use super::telegram::{TelegramBotAdapter, TelegramProvider};
use crate::config::TelegramSettings;
use crate::error::{AppError, AppResult};
use crate::external::telegram::{HttpTelegramBotApi, TelegramBotApi};

/// Creates the provider list once at startup.
///
/// The logging provider is always present. Telegram is added only when a bot
/// token is configured; otherwise the service degrades to logging alone.
pub fn build_providers(telegram: &TelegramSettings) -> AppResult<Vec<Arc<dyn NotificationProvider>>> {
    let mut providers: Vec<Arc<dyn NotificationProvider>> = vec![Arc::new(LoggingProvider::new())];

    if telegram.is_enabled() {
        let client = HttpTelegramBotApi::from_settings(telegram).map_err(|e| {
            AppError::Configuration {
                key: "telegram".to_string(),
                source: anyhow::Error::new(e),
            }
        })?;
        providers.push(telegram_provider(Arc::new(client), telegram.clone()));
        tracing::info!(chat_id = %telegram.chat_id, "Telegram provider enabled");
    } else {
        tracing::warn!("Telegram provider skipped: no BotToken found in configuration");
    }

    Ok(providers)
}

/// Wires a Telegram provider on top of any bot API implementation.
pub fn telegram_provider(
    client: Arc<dyn TelegramBotApi>,
    settings: TelegramSettings,
) -> Arc<dyn NotificationProvider> {
    let adapter = TelegramBotAdapter::new(client);
    Arc::new(TelegramProvider::new(Arc::new(adapter), settings))
}

pub fn build_dispatcher(telegram: &TelegramSettings) -> AppResult<NotificationDispatcher> {
    Ok(NotificationDispatcher::new(build_providers(telegram)?))
}

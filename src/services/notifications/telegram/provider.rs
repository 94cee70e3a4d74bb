use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::adapter::TelegramMessenger;
use crate::config::TelegramSettings;
use crate::error::{AppError, AppResult};
use crate::models::NotificationRequest;
use crate::services::notifications::provider::NotificationProvider;

/// Delivers every notification to the one configured chat.
///
/// The request's `recipient` is not used; the destination is deployment
/// configuration.
pub struct TelegramProvider {
    messenger: Arc<dyn TelegramMessenger>,
    settings: TelegramSettings,
}

impl TelegramProvider {
    pub fn new(messenger: Arc<dyn TelegramMessenger>, settings: TelegramSettings) -> Self {
        Self {
            messenger,
            settings,
        }
    }

    fn check_settings(&self) -> AppResult<()> {
        if self.settings.bot_token.trim().is_empty() {
            return Err(AppError::validation(
                "BotToken",
                "Telegram BotToken is not configured",
            ));
        }
        if self.settings.chat_id.trim().is_empty() {
            return Err(AppError::validation(
                "ChatId",
                "Telegram ChatId is not configured",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(
        &self,
        request: &NotificationRequest,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        self.check_settings()?;

        let result = self
            .messenger
            .send_text(&self.settings.chat_id, &request.message, cancel)
            .await;

        if let Err(ref error) = result {
            if !error.is_cancelled() {
                tracing::error!(
                    provider = self.name(),
                    chat_id = %self.settings.chat_id,
                    error = %error,
                    "Failed to send notification via Telegram"
                );
            }
        }
        result
    }
}

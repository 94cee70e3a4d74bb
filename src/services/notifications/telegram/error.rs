use thiserror::Error;

use crate::external::telegram::BotApiError;

/// Delivery failure raised by the Telegram adapter.
///
/// Wraps the bot API error so callers never depend on the client's error
/// type; the original error stays reachable through `source()`.
#[derive(Debug, Error)]
#[error("Telegram API error: {detail}")]
pub struct TelegramMessengerError {
    detail: String,
    #[source]
    source: BotApiError,
}

impl TelegramMessengerError {
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn api_error(&self) -> &BotApiError {
        &self.source
    }
}

impl From<BotApiError> for TelegramMessengerError {
    fn from(source: BotApiError) -> Self {
        Self {
            detail: source.to_string(),
            source,
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{ApiResponse, SendMessageRequest};
use crate::config::TelegramSettings;
use crate::external::client::build_http_client;

/// Failure reported by the Telegram Bot API or the transport underneath it.
#[derive(Debug, Error)]
pub enum BotApiError {
    /// The API answered with `ok: false`
    #[error("{description} (error code {error_code})")]
    Api { error_code: i64, description: String },

    /// Connection, timeout, or undecodable response. The request URL is
    /// stripped because it embeds the bot token.
    #[error("request to the bot API failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for BotApiError {
    fn from(error: reqwest::Error) -> Self {
        BotApiError::Transport(error.without_url())
    }
}

/// Remote bot API operations the delivery adapter depends on.
#[async_trait]
pub trait TelegramBotApi: Send + Sync {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<(), BotApiError>;
}

/// `reqwest`-backed bot API client. Safe to share across tasks.
#[derive(Clone)]
pub struct HttpTelegramBotApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTelegramBotApi {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_settings(settings: &TelegramSettings) -> Result<Self, BotApiError> {
        let client = build_http_client(Duration::from_secs(settings.request_timeout))?;
        Ok(Self::new(
            client,
            settings.api_base_url.as_str(),
            settings.bot_token.trim(),
        ))
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

#[async_trait]
impl TelegramBotApi for HttpTelegramBotApi {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<(), BotApiError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse = response.json().await?;
        if body.ok && status.is_success() {
            tracing::debug!(chat_id = %request.chat_id, "Telegram message accepted");
            return Ok(());
        }

        Err(BotApiError::Api {
            error_code: body.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
            description: body
                .description
                .unwrap_or_else(|| format!("HTTP {status}")),
        })
    }
}

//! Boundary between "send text to a chat" and the bot API client.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::TelegramMessengerError;
use super::formatter::escape_markdown_v2;
use crate::error::{AppError, AppResult};
use crate::external::telegram::{ChatId, ParseMode, SendMessageRequest, TelegramBotApi};

/// Sends plain text to a Telegram chat.
#[async_trait]
pub trait TelegramMessenger: Send + Sync {
    async fn send_text(
        &self,
        chat_id: &str,
        message: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()>;
}

/// Resolves chat ids, escapes text for MarkdownV2 and translates bot API
/// failures into [`TelegramMessengerError`]. One outbound call per message,
/// no retries.
pub struct TelegramBotAdapter {
    client: Arc<dyn TelegramBotApi>,
}

impl TelegramBotAdapter {
    pub fn new(client: Arc<dyn TelegramBotApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TelegramMessenger for TelegramBotAdapter {
    async fn send_text(
        &self,
        chat_id: &str,
        message: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        if chat_id.trim().is_empty() {
            return Err(AppError::validation("chat_id", "Chat id must not be blank"));
        }
        if message.trim().is_empty() {
            return Err(AppError::validation("message", "Message must not be blank"));
        }

        let request = SendMessageRequest {
            chat_id: ChatId::parse(chat_id),
            text: escape_markdown_v2(message).into_owned(),
            parse_mode: ParseMode::MarkdownV2,
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            sent = self.client.send_message(&request) => {
                sent.map_err(|e| AppError::Telegram(TelegramMessengerError::from(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::telegram::BotApiError;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingBotApi {
        sent: Mutex<Vec<SendMessageRequest>>,
        fail_with: Option<(i64, &'static str)>,
        delay: Option<Duration>,
    }

    impl RecordingBotApi {
        fn sent(&self) -> Vec<SendMessageRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TelegramBotApi for RecordingBotApi {
        async fn send_message(&self, request: &SendMessageRequest) -> Result<(), BotApiError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.sent.lock().unwrap().push(request.clone());
            match self.fail_with {
                Some((error_code, description)) => Err(BotApiError::Api {
                    error_code,
                    description: description.to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    fn adapter(api: &Arc<RecordingBotApi>) -> TelegramBotAdapter {
        TelegramBotAdapter::new(Arc::clone(api) as Arc<dyn TelegramBotApi>)
    }

    #[tokio::test]
    async fn test_numeric_chat_id_and_escaped_text() {
        let api = Arc::new(RecordingBotApi::default());

        adapter(&api)
            .send_text("12345", "Hello Telegram!", &CancellationToken::new())
            .await
            .unwrap();

        let sent = api.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, ChatId::Id(12345));
        assert_eq!(sent[0].text, "Hello Telegram\\!");
        assert_eq!(sent[0].parse_mode, ParseMode::MarkdownV2);
    }

    #[tokio::test]
    async fn test_username_chat_id() {
        let api = Arc::new(RecordingBotApi::default());

        adapter(&api)
            .send_text("@mychannel", "Hello", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            api.sent()[0].chat_id,
            ChatId::Username("@mychannel".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_arguments_rejected_without_calling_api() {
        let api = Arc::new(RecordingBotApi::default());
        let adapter = adapter(&api);
        let cancel = CancellationToken::new();

        let blank_chat = adapter.send_text("  ", "Hello", &cancel).await;
        assert!(matches!(blank_chat, Err(AppError::Validation { ref field, .. }) if field == "chat_id"));

        let blank_message = adapter.send_text("12345", "", &cancel).await;
        assert!(matches!(blank_message, Err(AppError::Validation { ref field, .. }) if field == "message"));

        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn test_api_failure_wrapped_with_cause() {
        let api = Arc::new(RecordingBotApi {
            fail_with: Some((400, "Bad Request: chat not found")),
            ..Default::default()
        });

        let error = adapter(&api)
            .send_text("12345", "Hello", &CancellationToken::new())
            .await
            .unwrap_err();

        match error {
            AppError::Telegram(ref wrapped) => {
                assert!(wrapped.to_string().starts_with("Telegram API error: "));
                assert!(wrapped.detail().contains("chat not found"));
                assert!(matches!(
                    wrapped.api_error(),
                    BotApiError::Api { error_code: 400, .. }
                ));
            }
            other => panic!("expected Telegram error, got {other:?}"),
        }
        assert!(error.source_chain().unwrap().contains("chat not found"));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_call() {
        let api = Arc::new(RecordingBotApi {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = adapter(&api).send_text("12345", "Hello", &cancel).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(api.sent().is_empty());
    }
}

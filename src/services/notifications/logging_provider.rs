//! Provider that records the notification in the application log.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::provider::NotificationProvider;
use crate::error::AppResult;
use crate::models::NotificationRequest;

/// Always-available baseline channel. It has no failure mode, so every
/// deployment keeps at least one working provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProvider;

impl LoggingProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationProvider for LoggingProvider {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn send(
        &self,
        request: &NotificationRequest,
        _cancel: &CancellationToken,
    ) -> AppResult<()> {
        tracing::info!(
            provider = self.name(),
            recipient = %request.recipient,
            message = %request.message,
            subject = request.subject.as_deref(),
            "Sending notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = LoggingProvider::new();
        let request = NotificationRequest::new("user@example.com", "hello");

        assert!(provider.send(&request, &CancellationToken::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_succeeds_even_when_cancelled() {
        let provider = LoggingProvider::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let request = NotificationRequest::new("user@example.com", "hello");
        assert!(provider.send(&request, &cancel).await.is_ok());
    }

    #[test]
    fn test_name() {
        assert_eq!(LoggingProvider.name(), "logging");
    }
}

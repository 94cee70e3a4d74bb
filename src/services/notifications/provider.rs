//! Core notification provider trait.
//!
//! A provider is one delivery channel. New channels are added by implementing
//! this trait and registering an instance with the dispatcher.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::models::NotificationRequest;

/// Trait for notification delivery channels (log sink, Telegram, ...)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync so one instance can serve concurrent
/// dispatches.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct StdoutProvider;
///
/// #[async_trait]
/// impl NotificationProvider for StdoutProvider {
///     fn name(&self) -> &'static str {
///         "stdout"
///     }
///
///     async fn send(&self, request: &NotificationRequest, _cancel: &CancellationToken) -> AppResult<()> {
///         println!("{}", request.message);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Stable identifier used in log records
    fn name(&self) -> &'static str;

    /// Delivers one notification.
    ///
    /// Failures must be returned, never swallowed; containment is the
    /// dispatcher's job. When `cancel` fires the provider should stop
    /// promptly and return [`AppError::Cancelled`](crate::error::AppError::Cancelled).
    async fn send(&self, request: &NotificationRequest, cancel: &CancellationToken)
    -> AppResult<()>;
}

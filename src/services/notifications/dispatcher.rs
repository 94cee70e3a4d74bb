//! Fan-out of one notification to every registered provider.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::provider::NotificationProvider;
use crate::error::{AppError, AppResult};
use crate::models::NotificationRequest;

/// How a single provider task ended, as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderOutcome {
    /// Attempted, whether or not delivery succeeded
    Completed,
    Cancelled,
}

/// Sends each notification through all providers concurrently.
///
/// The provider set is fixed at construction. A failing or panicking
/// provider is logged and never affects its siblings or the caller.
pub struct NotificationDispatcher {
    providers: Vec<Arc<dyn NotificationProvider>>,
}

impl NotificationDispatcher {
    pub fn new(providers: Vec<Arc<dyn NotificationProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Attempts delivery through every provider and waits for all of them.
    ///
    /// Returns `Ok(())` once every provider has been attempted, regardless of
    /// individual outcomes. Fails only for an invalid request, when `cancel`
    /// fires, or when a provider reports cancellation; outstanding provider
    /// tasks are aborted in the last two cases.
    pub async fn dispatch(
        &self,
        request: &NotificationRequest,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        if request.message.is_empty() {
            return Err(AppError::validation(
                "message",
                "Notification message must not be empty",
            ));
        }
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        tracing::info!(
            provider_count = self.providers.len(),
            "Dispatching notification to providers"
        );

        let request = Arc::new(request.clone());
        let mut tasks = JoinSet::new();
        for provider in &self.providers {
            tasks.spawn(run_provider(
                Arc::clone(provider),
                Arc::clone(&request),
                cancel.clone(),
            ));
        }

        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.shutdown().await;
                    cancelled = true;
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok(ProviderOutcome::Cancelled)) => {
                        tasks.shutdown().await;
                        cancelled = true;
                        break;
                    }
                    // Panics are caught inside `run_provider`, so a join error
                    // only comes from the runtime shutting down under us.
                    Some(Ok(ProviderOutcome::Completed)) | Some(Err(_)) => {}
                    None => break,
                }
            }
        }

        if cancelled {
            tracing::debug!("Notification dispatch cancelled");
            return Err(AppError::Cancelled);
        }
        Ok(())
    }
}

async fn run_provider(
    provider: Arc<dyn NotificationProvider>,
    request: Arc<NotificationRequest>,
    cancel: CancellationToken,
) -> ProviderOutcome {
    let name = provider.name();
    let outcome = AssertUnwindSafe(provider.send(&request, &cancel))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => {
            tracing::debug!(provider = name, "Notification sent");
            ProviderOutcome::Completed
        }
        Ok(Err(AppError::Cancelled)) => ProviderOutcome::Cancelled,
        Ok(Err(error)) => {
            tracing::error!(
                provider = name,
                error = %error,
                "Failed to send notification via provider"
            );
            ProviderOutcome::Completed
        }
        Err(panic) => {
            tracing::error!(
                provider = name,
                panic = panic_message(panic.as_ref()),
                "Provider panicked while sending notification"
            );
            ProviderOutcome::Completed
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Panic,
        WaitForCancel,
        ReportCancelled,
        Sleep(Duration),
    }

    struct MockProvider {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationProvider for MockProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(
            &self,
            _request: &NotificationRequest,
            cancel: &CancellationToken,
        ) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(AppError::internal("provider down")),
                Behavior::Panic => panic!("provider exploded"),
                Behavior::WaitForCancel => {
                    cancel.cancelled().await;
                    Err(AppError::Cancelled)
                }
                Behavior::ReportCancelled => Err(AppError::Cancelled),
                Behavior::Sleep(duration) => {
                    tokio::time::sleep(duration).await;
                    Ok(())
                }
            }
        }
    }

    fn dispatcher(providers: &[Arc<MockProvider>]) -> NotificationDispatcher {
        NotificationDispatcher::new(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn NotificationProvider>)
                .collect(),
        )
    }

    fn request() -> NotificationRequest {
        NotificationRequest::new("user@example.com", "hello")
    }

    #[tokio::test]
    async fn test_each_provider_invoked_once() {
        let first = MockProvider::new("first", Behavior::Succeed);
        let second = MockProvider::new("second", Behavior::Succeed);
        let dispatcher = dispatcher(&[first.clone(), second.clone()]);

        dispatcher
            .dispatch(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_short_circuit() {
        let failing = MockProvider::new("failing", Behavior::Fail);
        let healthy = MockProvider::new("healthy", Behavior::Succeed);
        let dispatcher = dispatcher(&[failing.clone(), healthy.clone()]);

        let result = dispatcher.dispatch(&request(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(failing.calls(), 1);
        assert_eq!(healthy.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_providers_failing_still_completes() {
        let a = MockProvider::new("a", Behavior::Fail);
        let b = MockProvider::new("b", Behavior::Fail);
        let c = MockProvider::new("c", Behavior::Fail);
        let dispatcher = dispatcher(&[a.clone(), b.clone(), c.clone()]);

        assert!(
            dispatcher
                .dispatch(&request(), &CancellationToken::new())
                .await
                .is_ok()
        );
        assert_eq!(a.calls() + b.calls() + c.calls(), 3);
    }

    #[tokio::test]
    async fn test_panicking_provider_is_contained() {
        let panicking = MockProvider::new("panicking", Behavior::Panic);
        let healthy = MockProvider::new("healthy", Behavior::Succeed);
        let dispatcher = dispatcher(&[panicking.clone(), healthy.clone()]);

        let result = dispatcher.dispatch(&request(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(healthy.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_providers_run() {
        let provider = MockProvider::new("only", Behavior::Succeed);
        let dispatcher = dispatcher(&[provider.clone()]);

        let result = dispatcher
            .dispatch(
                &NotificationRequest::new("user@example.com", ""),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "message"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_providers() {
        let provider = MockProvider::new("only", Behavior::Succeed);
        let dispatcher = dispatcher(&[provider.clone()]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = dispatcher.dispatch(&request(), &cancel).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_while_waiting_propagates() {
        let slow = MockProvider::new("slow", Behavior::WaitForCancel);
        let fast = MockProvider::new("fast", Behavior::Succeed);
        let dispatcher = dispatcher(&[slow.clone(), fast.clone()]);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.dispatch(&request(), &cancel),
        )
        .await
        .expect("dispatch should observe cancellation");

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(fast.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_reported_cancellation_is_not_swallowed() {
        let provider = MockProvider::new("cancelled", Behavior::ReportCancelled);
        let dispatcher = dispatcher(&[provider.clone()]);

        let result = dispatcher.dispatch(&request(), &CancellationToken::new()).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_provider_reported_cancellation_aborts_siblings() {
        let reporter = MockProvider::new("reporter", Behavior::ReportCancelled);
        let sleeper = MockProvider::new("sleeper", Behavior::Sleep(Duration::from_secs(3)));
        let dispatcher = dispatcher(&[reporter.clone(), sleeper.clone()]);

        let started = std::time::Instant::now();
        let result = dispatcher.dispatch(&request(), &CancellationToken::new()).await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "dispatch waited {:?} for the sleeping sibling",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn test_no_providers_completes() {
        let dispatcher = NotificationDispatcher::new(Vec::new());
        assert!(dispatcher.is_empty());
        assert!(
            dispatcher
                .dispatch(&request(), &CancellationToken::new())
                .await
                .is_ok()
        );
    }

    #[test]
    fn test_provider_names_in_registration_order() {
        let dispatcher = dispatcher(&[
            MockProvider::new("logging", Behavior::Succeed),
            MockProvider::new("telegram", Behavior::Succeed),
        ]);
        assert_eq!(dispatcher.provider_names(), vec!["logging", "telegram"]);
        assert_eq!(dispatcher.len(), 2);
    }
}

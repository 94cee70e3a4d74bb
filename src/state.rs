//! Application state for Axum web framework.

use std::sync::Arc;
use std::time::Duration;

use crate::api::middleware::{ExceptionHandler, ExceptionHandlerOptions};
use crate::config::{Environment, Settings};
use crate::error::AppResult;
use crate::services::NotificationDispatcher;
use crate::services::notifications::build_dispatcher;

/// Shared state handed to every handler.
///
/// Cloning is cheap; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Upper bound on one `/notify` dispatch
    pub request_timeout: Duration,
    pub exception_handler: Arc<ExceptionHandler>,
}

impl AppState {
    pub fn new(
        dispatcher: NotificationDispatcher,
        request_timeout: Duration,
        exception_handler: ExceptionHandler,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            request_timeout,
            exception_handler: Arc::new(exception_handler),
        }
    }

    /// Builds the provider set from configuration.
    pub fn from_settings(settings: &Settings, environment: Environment) -> AppResult<Self> {
        let dispatcher = build_dispatcher(&settings.telegram)?;
        Ok(Self::new(
            dispatcher,
            settings.server.request_timeout(),
            ExceptionHandler::new(environment, ExceptionHandlerOptions::default()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_settings_has_logging_only() {
        let state = AppState::from_settings(&Settings::default(), Environment::Development).unwrap();

        assert_eq!(state.dispatcher.provider_names(), vec!["logging"]);
        assert_eq!(state.request_timeout, Duration::from_secs(30));
        assert_eq!(state.exception_handler.environment(), Environment::Development);
    }
}

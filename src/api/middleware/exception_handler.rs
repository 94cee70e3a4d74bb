//! Maps errors escaping a handler to HTTP responses.
//!
//! `AppError::into_response` produces a production-safe body and attaches the
//! error to the response. `exception_middleware` then picks it up, logs it,
//! applies the custom mapper and the default table, and rewrites the body for
//! the running environment.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::{ErrorResponse, ExceptionDetail};
use crate::config::Environment;
use crate::error::AppError;

/// Optional override consulted before the default classification.
pub type CustomExceptionMapper =
    Arc<dyn Fn(&AppError) -> Option<(StatusCode, String)> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ExceptionHandlerOptions {
    pub custom_mapper: Option<CustomExceptionMapper>,
}

impl ExceptionHandlerOptions {
    pub fn with_custom_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&AppError) -> Option<(StatusCode, String)> + Send + Sync + 'static,
    {
        self.custom_mapper = Some(Arc::new(mapper));
        self
    }
}

/// Error that produced a response, carried in the response extensions.
#[derive(Clone)]
struct UnhandledError(Arc<AppError>);

/// Default status and user-facing message for each kind of error.
pub fn default_classification(error: &AppError) -> (StatusCode, &'static str) {
    match error {
        AppError::Validation { .. } | AppError::BadRequest { .. } => (
            StatusCode::BAD_REQUEST,
            "Invalid request. Please check your input.",
        ),
        AppError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "The requested resource was not found.",
        ),
        AppError::Conflict { .. } => (
            StatusCode::CONFLICT,
            "The operation could not be completed due to a conflict.",
        ),
        AppError::Unauthorized { .. } | AppError::Forbidden { .. } => (
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        ),
        AppError::Timeout { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "The service is temporarily unavailable. Please try again later.",
        ),
        AppError::Cancelled
        | AppError::Telegram(_)
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred. Please try again later.",
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = default_classification(&self);
        let mut response = (status, Json(ErrorResponse::new(status.as_u16(), message))).into_response();
        response
            .extensions_mut()
            .insert(UnhandledError(Arc::new(self)));
        response
    }
}

/// Turns errors into responses for one deployment environment.
#[derive(Clone)]
pub struct ExceptionHandler {
    environment: Environment,
    options: ExceptionHandlerOptions,
}

impl ExceptionHandler {
    pub fn new(environment: Environment, options: ExceptionHandlerOptions) -> Self {
        Self {
            environment,
            options,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Custom mapper first, default table otherwise.
    pub fn classify(&self, error: &AppError) -> (StatusCode, String) {
        if let Some(mapped) = self
            .options
            .custom_mapper
            .as_ref()
            .and_then(|mapper| mapper(error))
        {
            return mapped;
        }
        let (status, message) = default_classification(error);
        (status, message.to_string())
    }

    pub fn build_error_response(&self, error: &AppError) -> (StatusCode, ErrorResponse) {
        let (status, message) = self.classify(error);
        let mut body = ErrorResponse::new(status.as_u16(), message);
        if self.environment.is_development() {
            body = body.with_exception(ExceptionDetail {
                kind: error.kind().to_string(),
                message: error.to_string(),
                stack_trace: error.source_chain(),
            });
        }
        (status, body)
    }

    /// Logs the error with full detail and renders the response. Never fails.
    pub fn handle(&self, error: &AppError) -> Response {
        tracing::error!(
            error_type = error.kind(),
            error = %error,
            cause = error.source_chain().as_deref(),
            "Unhandled exception occurred"
        );

        let (status, body) = self.build_error_response(error);
        (status, Json(body)).into_response()
    }
}

/// Rewrites every response that carries an [`AppError`].
pub async fn exception_middleware(
    State(handler): State<Arc<ExceptionHandler>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<UnhandledError>() {
        Some(UnhandledError(error)) => handler.handle(&error),
        None => response,
    }
}

/// `CatchPanicLayer` hook: a handler panic becomes an internal error that
/// still flows through `exception_middleware`.
pub fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };
    AppError::internal(format!("handler panicked: {detail}")).into_response()
}

//! Notification API handlers.

use axum::{extract::State, http::StatusCode};
use tokio_util::sync::CancellationToken;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{ErrorResponse, NotifyRequest};
use crate::error::{AppError, AppResult, ValidationFieldError};
use crate::models::NotificationRequest;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(notify))
}

/// POST /notify - Fan a notification out to every configured provider
///
/// Responds once every provider has been attempted. Individual provider
/// failures are logged and never change the response.
#[utoipa::path(
    post,
    path = "/notify",
    tag = NOTIFICATION_TAG,
    request_body = NotifyRequest,
    responses(
        (status = 202, description = "Notification accepted and dispatched"),
        (status = 400, description = "Field validation failed", body = Vec<ValidationFieldError>),
        (status = 503, description = "Dispatch did not finish in time", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn notify(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NotifyRequest>,
) -> AppResult<StatusCode> {
    let request = NotificationRequest::from(payload);

    // Dropping the guard cancels in-flight providers if the client goes away
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let timeout = state.request_timeout;
    match tokio::time::timeout(timeout, state.dispatcher.dispatch(&request, &cancel)).await {
        Ok(result) => result?,
        Err(_) => {
            cancel.cancel();
            return Err(AppError::Timeout {
                operation: "notify".to_string(),
                seconds: timeout.as_secs(),
            });
        }
    }

    Ok(StatusCode::ACCEPTED)
}

//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    exception_middleware, logging_middleware, panic_to_response, request_id_middleware,
};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Request ID - generates/propagates `x-request-id`
/// 2. Logging - request/response events inside a span carrying the ID
/// 3. Exception handler - logs and renders any `AppError` response
/// 4. Panic catcher - turns handler panics into an `AppError`
///
/// # Routes
/// - `POST /notify`
/// - `GET /health`
/// - `GET /openapi.json`
/// - `GET /swagger-ui` - interactive API reference
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::notifications::notification_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", openapi))
        .layer(CatchPanicLayer::custom(panic_to_response))
        .layer(middleware::from_fn_with_state(
            state.exception_handler.clone(),
            exception_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";
pub const NOTIFICATION_TAG: &str = "Notifications";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notification Service",
        description = "Fans notifications out to logging and Telegram providers",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::ExceptionDetail,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = NOTIFICATION_TAG, description = "Notification dispatch endpoints"),
    )
)]
pub struct ApiDoc;

//! Notification request DTOs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::NotificationRequest;

/// Body of `POST /notify`.
///
/// Missing `recipient` or `message` deserialize as empty strings so they are
/// reported as field errors rather than as a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "recipient": "user@example.com",
    "message": "Deployment *finished*",
    "subject": "CI",
    "properties": {"pipeline": "42"}
}))]
pub struct NotifyRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "The recipient field is required."),
        email(message = "The recipient field is not a valid e-mail address.")
    )]
    pub recipient: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "The message field is required."))]
    pub message: String,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub properties: Option<HashMap<String, String>>,
}

impl From<NotifyRequest> for NotificationRequest {
    fn from(dto: NotifyRequest) -> Self {
        NotificationRequest {
            recipient: dto.recipient,
            message: dto.message,
            subject: dto.subject,
            properties: dto.properties,
        }
    }
}

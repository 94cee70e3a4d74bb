//! Error response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response produced by the exception handler.
///
/// `exception` is always serialized; it is `null` outside development.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = 500)]
    pub status_code: u16,
    #[schema(example = "An internal server error occurred. Please try again later.")]
    pub message: String,
    pub exception: Option<ExceptionDetail>,
}

/// Error internals disclosed only in development.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetail {
    #[serde(rename = "type")]
    #[schema(example = "TimeoutError")]
    pub kind: String,
    pub message: String,
    pub stack_trace: Option<String>,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            exception: None,
        }
    }

    pub fn with_exception(mut self, exception: ExceptionDetail) -> Self {
        self.exception = Some(exception);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exception_serialized_as_null_when_absent() {
        let body = ErrorResponse::new(500, "boom");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"statusCode": 500, "message": "boom", "exception": null})
        );
    }

    #[test]
    fn test_exception_detail_field_names() {
        let body = ErrorResponse::new(503, "later").with_exception(ExceptionDetail {
            kind: "TimeoutError".to_string(),
            message: "took too long".to_string(),
            stack_trace: None,
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["exception"]["type"], "TimeoutError");
        assert_eq!(value["exception"]["message"], "took too long");
        assert!(value["exception"]["stackTrace"].is_null());
    }
}

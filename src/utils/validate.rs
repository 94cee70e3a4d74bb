use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, ValidationFieldError};

/// JSON body extractor that runs `validator` rules before the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Why a [`ValidatedJson`] body was refused.
#[derive(Debug)]
pub enum ValidationRejection {
    /// Body parsed but failed field rules; answered with the field list.
    Invalid(Vec<ValidationFieldError>),
    /// Body could not be read as JSON; goes through the exception handler.
    Malformed(AppError),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        match self {
            ValidationRejection::Invalid(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ValidationRejection::Malformed(error) => error.into_response(),
        }
    }
}

impl From<JsonRejection> for ValidationRejection {
    fn from(rejection: JsonRejection) -> Self {
        ValidationRejection::Malformed(AppError::BadRequest {
            message: rejection.body_text(),
        })
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| ValidationRejection::Invalid(ValidationFieldError::from_errors(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Contact {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 1, message = "Text is required"))]
        text: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let request = json_request(r#"{"email":"a@example.com","text":"hi"}"#);

        let ValidatedJson(contact) = ValidatedJson::<Contact>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(contact.email, "a@example.com");
        assert_eq!(contact.text, "hi");
    }

    #[tokio::test]
    async fn test_field_errors_are_listed() {
        let request = json_request(r#"{"email":"nope","text":""}"#);

        match ValidatedJson::<Contact>::from_request(request, &()).await {
            Err(ValidationRejection::Invalid(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].member_names, vec!["email".to_string()]);
                assert_eq!(errors[0].error_message, "Invalid email format");
                assert_eq!(errors[1].member_names, vec!["text".to_string()]);
            }
            other => panic!("Expected Invalid rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request("{not json");

        match ValidatedJson::<Contact>::from_request(request, &()).await {
            Err(ValidationRejection::Malformed(AppError::BadRequest { message })) => {
                assert!(!message.is_empty());
            }
            other => panic!("Expected Malformed rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::from(r#"{"email":"a@example.com","text":"hi"}"#))
            .unwrap();

        let rejection = ValidatedJson::<Contact>::from_request(request, &())
            .await
            .unwrap_err();

        assert!(matches!(rejection, ValidationRejection::Malformed(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::ConfigError;
use crate::services::notifications::telegram::TelegramMessengerError;

/// Application-wide error type that represents all possible errors in the system.
///
/// Every failure that can reach the HTTP boundary is one of these variants.
/// The exception handler classifies them into status codes; providers use
/// them to report delivery failures to the dispatcher.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing argument
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Malformed request body or parameters
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Operation not valid for the current state
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Operation exceeded its time budget
    #[error("Operation timed out: {operation} after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// The caller's cancellation token fired
    #[error("Operation was cancelled")]
    Cancelled,

    /// Delivery through the Telegram bot API failed
    #[error(transparent)]
    Telegram(#[from] TelegramMessengerError),

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            source: anyhow::anyhow!(message.into()),
        }
    }

    /// Stable type name reported in development error details.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "ValidationError",
            AppError::BadRequest { .. } => "BadRequestError",
            AppError::NotFound { .. } => "NotFoundError",
            AppError::Conflict { .. } => "ConflictError",
            AppError::Unauthorized { .. } => "UnauthorizedError",
            AppError::Forbidden { .. } => "ForbiddenError",
            AppError::Timeout { .. } => "TimeoutError",
            AppError::Cancelled => "CancelledError",
            AppError::Telegram(_) => "TelegramMessengerError",
            AppError::Configuration { .. } => "ConfigurationError",
            AppError::Internal { .. } => "InternalError",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    /// Renders the chain of underlying causes, one per line.
    ///
    /// Returns `None` when the error has no cause. This is the closest
    /// analogue of a stack trace the error carries.
    pub fn source_chain(&self) -> Option<String> {
        let mut current = std::error::Error::source(self);
        if current.is_none() {
            return None;
        }

        let mut lines = Vec::new();
        while let Some(cause) = current {
            lines.push(format!("caused by: {cause}"));
            current = cause.source();
        }
        Some(lines.join("\n"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = ValidationFieldError::from_errors(&errors);
        match fields.pop() {
            Some(first) => AppError::Validation {
                field: first.member_names.join(","),
                reason: first.error_message,
            },
            None => AppError::validation("request", "validation failed"),
        }
    }
}

/// One field-level validation failure as reported to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFieldError {
    pub member_names: Vec<String>,
    pub error_message: String,
}

impl ValidationFieldError {
    /// Flattens validator output into one entry per failed rule, ordered by field name.
    pub fn from_errors(errors: &validator::ValidationErrors) -> Vec<Self> {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| ValidationFieldError {
                    member_names: vec![field.to_string()],
                    error_message: failure
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("The {field} field is invalid ({}).", failure.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.member_names.cmp(&b.member_names));
        fields
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Contact {
        #[validate(email(message = "The recipient field is not a valid e-mail address."))]
        recipient: String,
        #[validate(length(min = 1))]
        message: String,
    }

    #[test]
    fn test_source_chain_absent_without_cause() {
        let error = AppError::validation("message", "must not be empty");
        assert!(error.source_chain().is_none());
    }

    #[test]
    fn test_source_chain_lists_causes() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("disk full").context("write failed"),
        };
        let chain = error.source_chain().unwrap();
        assert!(chain.contains("write failed"));
        assert!(chain.contains("disk full"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AppError::Cancelled.kind(), "CancelledError");
        assert_eq!(
            AppError::validation("chat_id", "blank").kind(),
            "ValidationError"
        );
    }

    #[test]
    fn test_field_errors_sorted_and_messaged() {
        let contact = Contact {
            recipient: "nope".to_string(),
            message: String::new(),
        };
        let errors = contact.validate().unwrap_err();
        let fields = ValidationFieldError::from_errors(&errors);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].member_names, vec!["message".to_string()]);
        assert!(fields[0].error_message.contains("length"));
        assert_eq!(fields[1].member_names, vec!["recipient".to_string()]);
        assert_eq!(
            fields[1].error_message,
            "The recipient field is not a valid e-mail address."
        );
    }

    #[test]
    fn test_config_error_keeps_field_as_key() {
        let error: AppError = ConfigError::validation("telegram.chat_id", "required").into();
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "telegram.chat_id"),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors_convert_to_validation_variant() {
        let contact = Contact {
            recipient: "user@example.com".to_string(),
            message: String::new(),
        };
        let error: AppError = contact.validate().unwrap_err().into();
        assert!(matches!(error, AppError::Validation { ref field, .. } if field == "message"));
    }
}

//! Data Transfer Objects for API requests and responses.
//!
//! - `notification` - `/notify` request body
//! - `health` - health check response
//! - `error` - error response emitted by the exception handler

mod error;
mod health;
mod notification;

pub use error::{ErrorResponse, ExceptionDetail};
pub use health::{HealthResponse, HealthStatus};
pub use notification::NotifyRequest;

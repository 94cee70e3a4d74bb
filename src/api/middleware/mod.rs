//! Middleware components for request processing.
//!
//! Request ID tracking, request logging and exception mapping.

mod exception_handler;
mod logging;
mod request_id;

pub use exception_handler::{
    CustomExceptionMapper, ExceptionHandler, ExceptionHandlerOptions, default_classification,
    exception_middleware, panic_to_response,
};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};

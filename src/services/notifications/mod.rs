//! Notification delivery with pluggable providers.
//!
//! The `NotificationProvider` trait is the single capability every channel
//! implements; `NotificationDispatcher` fans one request out to all of them.

mod dispatcher;
mod logging_provider;
mod provider;
mod registry;

pub mod telegram;

pub use dispatcher::NotificationDispatcher;
pub use logging_provider::LoggingProvider;
pub use provider::NotificationProvider;
pub use registry::{build_dispatcher, build_providers, telegram_provider};

//! Service layer: notification delivery and its providers.

pub mod notifications;

pub use notifications::{NotificationDispatcher, NotificationProvider};

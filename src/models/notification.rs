//! Domain notification passed from the HTTP boundary to the dispatcher.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single notification to relay to every registered provider.
///
/// Built once from a validated API payload and read-only afterwards.
/// `recipient` is a destination hint; providers with a process-wide
/// destination (Telegram) ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub recipient: String,
    pub message: String,
    pub subject: Option<String>,
    pub properties: Option<HashMap<String, String>>,
}

impl NotificationRequest {
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            message: message.into(),
            subject: None,
            properties: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let request = NotificationRequest::new("ops@example.com", "disk full")
            .with_subject("alert")
            .with_property("host", "db-1")
            .with_property("severity", "high");

        assert_eq!(request.subject.as_deref(), Some("alert"));
        let properties = request.properties.unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties["host"], "db-1");
    }

    #[test]
    fn test_structural_equality_ignores_property_order() {
        let a = NotificationRequest::new("a@example.com", "hi")
            .with_property("x", "1")
            .with_property("y", "2");
        let b = NotificationRequest::new("a@example.com", "hi")
            .with_property("y", "2")
            .with_property("x", "1");
        assert_eq!(a, b);
    }
}

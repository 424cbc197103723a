//! Field visitor turning a tracing event into a notification request.
//!
//! Recognised fields:
//! - `message`: the formatted event message, used as the description
//! - `title`: optional title
//! - `persistent`: when `true`, the notification is never auto-dismissed
//!
//! Any other field is ignored.

use crate::domain::request::{Category, NotificationRequest};
use std::fmt;
use tracing::field::{Field, Visit};

#[derive(Debug, Default)]
pub(crate) struct RequestVisitor {
    title: Option<String>,
    description: Option<String>,
    persistent: bool,
}

impl RequestVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the visitor and build the request.
    pub fn into_request(self, category: Category) -> NotificationRequest {
        NotificationRequest {
            category,
            title: self.title,
            description: self.description,
            persistent: self.persistent,
            ..NotificationRequest::default()
        }
    }

    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.description = Some(value),
            "title" => self.title = Some(value),
            _ => {}
        }
    }
}

impl Visit for RequestVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "persistent" {
            self.persistent = value;
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_visitor() {
        let request = RequestVisitor::new().into_request(Category::Default);

        assert_eq!(request.category, Category::Default);
        assert!(request.title.is_none());
        assert!(request.description.is_none());
        assert!(!request.is_persistent());
    }
}

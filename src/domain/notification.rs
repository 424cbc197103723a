//! Admitted notifications.

use crate::domain::request::{Action, Category, NotificationPatch, NotificationRequest};
use std::fmt;
use std::time::{Duration, Instant};

/// Identifier assigned to a notification when it is admitted.
///
/// Ids are unique within one store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// An admitted notification as held by the store.
///
/// `visible` is true while the notification is shown and becomes false when
/// its exit transition starts. It is removed from the store once the exit
/// delay has elapsed.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    request: NotificationRequest,
    visible: bool,
    created_at: Instant,
}

impl Notification {
    pub(crate) fn new(id: NotificationId, request: NotificationRequest, created_at: Instant) -> Self {
        Self {
            id,
            request,
            visible: true,
            created_at,
        }
    }

    /// The notification's id.
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Variant tag.
    pub fn category(&self) -> Category {
        self.request.category
    }

    /// Optional heading.
    pub fn title(&self) -> Option<&str> {
        self.request.title.as_deref()
    }

    /// Optional body text.
    pub fn description(&self) -> Option<&str> {
        self.request.description.as_deref()
    }

    /// Body text, empty when no description was given.
    pub fn body(&self) -> &str {
        self.request.body()
    }

    /// Attached interactive element.
    pub fn action(&self) -> Option<&Action> {
        self.request.action.as_ref()
    }

    /// False once the exit transition has started.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the notification is exempt from automatic expiry.
    pub fn is_persistent(&self) -> bool {
        self.request.is_persistent()
    }

    /// Admission time.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Lifetime override requested by the publisher.
    pub fn lifetime(&self) -> Option<Duration> {
        self.request.lifetime
    }

    /// The request this notification was admitted from.
    pub fn request(&self) -> &NotificationRequest {
        &self.request
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn apply(&mut self, patch: NotificationPatch) {
        if let Some(category) = patch.category {
            self.request.category = category;
        }
        if let Some(title) = patch.title {
            self.request.title = Some(title);
        }
        if let Some(description) = patch.description {
            self.request.description = Some(description);
        }
        if let Some(action) = patch.action {
            self.request.action = Some(action);
        }
    }
}

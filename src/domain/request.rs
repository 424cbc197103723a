//! Notification requests as published by collaborators.
//!
//! A request carries everything a caller wants shown. The system-assigned
//! fields (id, visibility, admission time) are added later by the store.

use crate::domain::dedup_key::DedupKey;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Severity/variant tag of a notification.
///
/// The presentation layer maps this to styling. The core only uses it as part
/// of the deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Regular informational notification.
    #[default]
    Default,
    /// Error or destructive-action notification.
    Destructive,
}

impl Category {
    /// Stable lowercase name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Default => "default",
            Category::Destructive => "destructive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to an interactive element attached to a notification.
///
/// The core never inspects the payload. It is carried through to the
/// presentation layer, which can recover it with [`Action::downcast_ref`].
#[derive(Clone)]
pub struct Action(Arc<dyn Any + Send + Sync>);

impl Action {
    /// Wrap an arbitrary payload.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    /// Borrow the payload as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same payload.
    pub fn ptr_eq(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(<opaque>)")
    }
}

/// A request to show a notification.
///
/// Requests with neither a title nor a description are accepted and render
/// with an empty body.
///
/// # Example
/// ```
/// use toast_dispatch::{Category, NotificationRequest};
///
/// let request = NotificationRequest::new(Category::Destructive)
///     .with_title("Network")
///     .with_description("Failed to load buses");
///
/// assert_eq!(request.category, Category::Destructive);
/// assert!(!request.is_persistent());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotificationRequest {
    /// Variant tag used for styling and deduplication
    pub category: Category,
    /// Optional short heading
    pub title: Option<String>,
    /// Optional body text
    pub description: Option<String>,
    /// Optional interactive element, carried but never inspected
    pub action: Option<Action>,
    /// Opt out of automatic expiry
    pub persistent: bool,
    /// Override for the default auto-dismiss lifetime
    pub lifetime: Option<Duration>,
}

impl NotificationRequest {
    /// Create an empty request of the given category.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Shorthand for a request with only a description.
    pub fn message(category: Category, description: impl Into<String>) -> Self {
        Self::new(category).with_description(description)
    }

    /// Shorthand for an error notification ("failed to load X").
    pub fn error(description: impl Into<String>) -> Self {
        Self::message(Category::Destructive, description)
    }

    /// Shorthand for a regular notification.
    pub fn info(description: impl Into<String>) -> Self {
        Self::message(Category::Default, description)
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an interactive element. This also makes the notification persistent.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Keep the notification until it is dismissed explicitly.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Override the auto-dismiss lifetime for this notification.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Whether this notification is exempt from automatic expiry.
    ///
    /// A request is persistent when flagged explicitly or when it carries an
    /// action that expects a user response.
    pub fn is_persistent(&self) -> bool {
        self.persistent || self.action.is_some()
    }

    /// Text shown as the body, empty when no description was given.
    pub fn body(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Key used by the deduplication gate.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::for_request(self)
    }
}

/// Partial update applied to an active notification.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    /// Replacement category
    pub category: Option<Category>,
    /// Replacement title
    pub title: Option<String>,
    /// Replacement description
    pub description: Option<String>,
    /// Replacement action
    pub action: Option<Action>,
}

impl NotificationPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the category.
    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Replace the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the action.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.action.is_none()
    }
}

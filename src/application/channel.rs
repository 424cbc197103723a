//! In-process broadcast channel for notification requests.
//!
//! Collaborators publish requests without holding a reference to the store.
//! The dispatcher is the one subscriber in normal operation. The channel is a
//! plain value scoped to the application instance, so two instances (for
//! example two tests) never see each other's requests.

use crate::domain::request::{Category, NotificationRequest};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback invoked for every published request.
pub type Handler = Arc<dyn Fn(&NotificationRequest) + Send + Sync + 'static>;

/// Publish/subscribe channel for notification requests.
///
/// Cloning the channel yields another handle to the same subscriber list.
///
/// # Example
/// ```
/// use toast_dispatch::{NotificationChannel, NotificationRequest};
/// use std::sync::{Arc, Mutex};
///
/// let channel = NotificationChannel::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let subscription = channel.subscribe(move |request: &NotificationRequest| {
///     sink.lock().unwrap().push(request.body().to_string());
/// });
///
/// channel.error("Failed to load buses");
/// drop(subscription);
/// channel.error("dropped, nobody listens");
///
/// assert_eq!(*seen.lock().unwrap(), vec!["Failed to load buses".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct NotificationChannel {
    inner: Arc<ChannelInner>,
}

#[derive(Default)]
struct ChannelInner {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler)>>,
}

impl ChannelInner {
    fn handlers(&self) -> MutexGuard<'_, Vec<(u64, Handler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: u64) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }
}

impl NotificationChannel {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a request to every subscriber, in subscription order.
    ///
    /// Fire-and-forget: when nobody is subscribed the request is dropped.
    /// Handlers run on the caller's thread before `publish` returns, and
    /// without the channel lock held, so a handler may publish or
    /// unsubscribe itself.
    pub fn publish(&self, request: NotificationRequest) {
        let handlers: Vec<Handler> = self
            .inner
            .handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(&request);
        }
    }

    /// Publish a request holding only a description.
    pub fn notify(&self, category: Category, message: impl Into<String>) {
        self.publish(NotificationRequest::message(category, message));
    }

    /// Publish an error notification, e.g. "failed to load X".
    pub fn error(&self, message: impl Into<String>) {
        self.notify(Category::Destructive, message);
    }

    /// Publish a regular notification.
    pub fn info(&self, message: impl Into<String>) {
        self.notify(Category::Default, message);
    }

    /// Register a handler. It stays registered until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&NotificationRequest) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers().push((id, Arc::new(handler)));
        Subscription {
            id,
            channel: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers().len()
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard for a registered handler. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    channel: Weak<ChannelInner>,
    active: bool,
}

impl Subscription {
    /// Remove the handler from the channel.
    ///
    /// Returns `true` the first time, `false` once already unsubscribed or
    /// when the channel is gone.
    pub fn unsubscribe(&mut self) -> bool {
        if !std::mem::take(&mut self.active) {
            return false;
        }
        match self.channel.upgrade() {
            Some(inner) => inner.remove(self.id),
            None => false,
        }
    }

    /// Whether the handler is still registered.
    pub fn is_active(&self) -> bool {
        self.active && self.channel.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for ChannelInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelInner")
            .field("subscribers", &self.handlers().len())
            .finish()
    }
}

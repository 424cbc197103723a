//! Tracing integration layer.
//!
//! Provides a `tracing_subscriber::Layer` that turns tracing events with a
//! dedicated target into notification requests, so code that already logs
//! can raise a toast without holding a channel handle.

use crate::application::channel::NotificationChannel;
use crate::domain::request::Category;
use crate::infrastructure::visitor::RequestVisitor;
use std::sync::Arc;
use tracing::{Level, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

/// Target forwarded by default.
pub const DEFAULT_TARGET: &str = "toast";

/// A `tracing::Layer` publishing matching events to a [`NotificationChannel`].
///
/// Only events whose target equals the configured target are forwarded;
/// everything else passes through untouched. `ERROR` events become
/// destructive notifications, every other level a default one.
///
/// # Example
///
/// ```
/// use toast_dispatch::{DispatcherBuilder, NotificationChannel, NotificationLayer};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let channel = NotificationChannel::new();
/// let dispatcher = DispatcherBuilder::new().build(&channel).unwrap();
///
/// let subscriber = tracing_subscriber::registry().with(NotificationLayer::new(channel.clone()));
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::error!(target: "toast", title = "Buses", "Failed to load buses");
///     tracing::error!("ordinary log line, not a toast");
/// });
///
/// let active = dispatcher.snapshot();
/// assert_eq!(active.len(), 1);
/// assert_eq!(active[0].body(), "Failed to load buses");
/// ```
#[derive(Debug, Clone)]
pub struct NotificationLayer {
    channel: NotificationChannel,
    target: Arc<str>,
}

impl NotificationLayer {
    /// Forward events with the `"toast"` target to `channel`.
    pub fn new(channel: NotificationChannel) -> Self {
        Self {
            channel,
            target: Arc::from(DEFAULT_TARGET),
        }
    }

    /// Forward events with a different target.
    ///
    /// Targets are matched exactly.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Arc::from(target.into());
        self
    }

    /// The target being forwarded.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<S> Layer<S> for NotificationLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() != &*self.target {
            return;
        }

        let category = if *metadata.level() == Level::ERROR {
            Category::Destructive
        } else {
            Category::Default
        };

        let mut visitor = RequestVisitor::new();
        event.record(&mut visitor);
        self.channel.publish(visitor.into_request(category));
    }
}

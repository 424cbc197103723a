//! Builder wiring the default adapters into a [`Dispatcher`].

use crate::application::{
    channel::NotificationChannel,
    dispatcher::Dispatcher,
    gate::DedupGate,
    metrics::Metrics,
    ports::{Clock, EvictionPolicy},
    store::{NotificationStore, StoreConfig},
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::eviction::EvictionStrategy;
use crate::infrastructure::storage::ShardedStorage;
use std::sync::Arc;
use std::time::Duration;

/// Error returned when building a [`Dispatcher`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// `max_visible` must be at least one
    ZeroMaxVisible,
    /// The debounce window must be longer than zero
    ZeroDebounceWindow,
    /// The default lifetime must be longer than zero
    ZeroLifetime,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::ZeroMaxVisible => write!(f, "max_visible must be greater than 0"),
            BuildError::ZeroDebounceWindow => {
                write!(f, "debounce window must be greater than 0")
            }
            BuildError::ZeroLifetime => write!(f, "default lifetime must be greater than 0"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder for constructing a [`Dispatcher`].
///
/// Defaults:
/// - Debounce window: 500 ms
/// - Max visible: 3
/// - Default lifetime: 5 seconds
/// - Exit delay: 300 ms
/// - Eviction: oldest first
/// - Clock: [`SystemClock`]
///
/// # Example
///
/// ```
/// use toast_dispatch::{DispatcherBuilder, EvictionStrategy, NotificationChannel};
/// use std::time::Duration;
///
/// let channel = NotificationChannel::new();
/// let dispatcher = DispatcherBuilder::new()
///     .with_max_visible(1)
///     .with_exit_delay(Duration::ZERO)
///     .with_eviction_strategy(EvictionStrategy::PersistentExempt)
///     .build(&channel)
///     .unwrap();
///
/// channel.error("Failed to load buses");
/// assert_eq!(dispatcher.snapshot().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DispatcherBuilder {
    debounce_window: Duration,
    store: StoreConfig,
    eviction: EvictionStrategy,
    custom_eviction: Option<Arc<dyn EvictionPolicy>>,
    clock: Option<Arc<dyn Clock>>,
}

impl DispatcherBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
            store: StoreConfig::default(),
            eviction: EvictionStrategy::default(),
            custom_eviction: None,
            clock: None,
        }
    }

    /// Set how long an admitted key suppresses identical requests.
    ///
    /// The value will be validated when `build()` is called. A window too
    /// large to add to the current time (e.g. `Duration::MAX`) suppresses
    /// until teardown.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Set the maximum number of notifications held at once.
    ///
    /// Exiting notifications count toward the bound. `1` is a valid strict
    /// setting.
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.store.max_visible = max_visible;
        self
    }

    /// Set the lifetime of notifications that do not carry their own.
    pub fn with_default_lifetime(mut self, lifetime: Duration) -> Self {
        self.store.default_lifetime = lifetime;
        self
    }

    /// Set the delay between dismissal and removal.
    ///
    /// `Duration::ZERO` removes dismissed notifications immediately.
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.store.exit_delay = delay;
        self
    }

    /// Choose one of the built-in eviction strategies.
    pub fn with_eviction_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.eviction = strategy;
        self.custom_eviction = None;
        self
    }

    /// Use a custom eviction policy instead of a built-in strategy.
    pub fn with_eviction_policy(mut self, policy: Arc<dyn EvictionPolicy>) -> Self {
        self.custom_eviction = Some(policy);
        self
    }

    /// Set a custom clock.
    ///
    /// Use `ManualClock` to drive timers by hand, or `TokioClock` together
    /// with the tokio driver when the runtime's time is paused.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the dispatcher and subscribe it to `channel`.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn build(self, channel: &NotificationChannel) -> Result<Dispatcher, BuildError> {
        if self.store.max_visible == 0 {
            return Err(BuildError::ZeroMaxVisible);
        }
        if self.debounce_window.is_zero() {
            return Err(BuildError::ZeroDebounceWindow);
        }
        if self.store.default_lifetime.is_zero() {
            return Err(BuildError::ZeroLifetime);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let eviction = self
            .custom_eviction
            .unwrap_or_else(|| self.eviction.into_policy());

        let gate = DedupGate::new(Box::new(ShardedStorage::new()), self.debounce_window);
        let store = NotificationStore::new(self.store, eviction);

        Ok(Dispatcher::new(channel, gate, store, clock, Metrics::new()))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

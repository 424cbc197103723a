//! # toast-dispatch
//!
//! Deduplicated, bounded, auto-expiring transient notifications ("toasts").
//!
//! Collaborators publish notification requests on a [`NotificationChannel`]
//! without holding a reference to any UI state. A single [`Dispatcher`]
//! subscribes to the channel, drops identical requests that arrive within a
//! short debounce window, and keeps the survivors in a small ordered store
//! that expires them automatically. The presentation layer reads the store
//! through a [`Presenter`] and forwards user dismissals back.
//!
//! ## Quick Start
//!
//! ```rust
//! use toast_dispatch::{DispatcherBuilder, NotificationChannel, NotificationRequest};
//!
//! let channel = NotificationChannel::new();
//! let dispatcher = DispatcherBuilder::new().build(&channel).unwrap();
//! let presenter = dispatcher.presenter();
//!
//! // Five identical failures inside the debounce window produce one toast
//! for _ in 0..5 {
//!     channel.error("Failed to load buses");
//! }
//! channel.publish(NotificationRequest::info("Uploading").with_title("Sync"));
//!
//! let active = presenter.snapshot();
//! assert_eq!(active.len(), 2);
//! assert_eq!(active[0].body(), "Failed to load buses");
//!
//! presenter.dismiss(active[0].id());
//! ```
//!
//! ## Features
//!
//! - **Debounce**: requests with the same category and text are suppressed for
//!   500 ms after the first one, however many arrive in between
//! - **Bounded store**: at most 3 notifications are held at once; the oldest
//!   is evicted to make room, never the one just added
//! - **Lifecycle**: visible notifications dismiss themselves after 5 seconds,
//!   then stay in an exiting state for 300 ms before removal
//! - **Persistence**: requests carrying an action, or marked persistent, stay
//!   until the user dismisses them
//! - **Tracing bridge**: [`NotificationLayer`] turns `tracing` events with
//!   target `"toast"` into requests
//! - **Timer driver** (`async` feature): a tokio task services timers without
//!   host involvement
//!
//! ## Deduplication Keys
//!
//! The key hashes the category and the description, falling back to the
//! title when there is no description. The title is ignored when a
//! description exists:
//!
//! ```rust
//! use toast_dispatch::NotificationRequest;
//!
//! let a = NotificationRequest::error("Failed to load buses").with_title("Network");
//! let b = NotificationRequest::error("Failed to load buses").with_title("Timetable");
//! assert_eq!(a.dedup_key(), b.dedup_key());
//!
//! let c = NotificationRequest::info("Failed to load buses");
//! assert_ne!(a.dedup_key(), c.dedup_key());
//! ```
//!
//! The key is released once the window elapses, even when the notification it
//! admitted was dismissed earlier.
//!
//! ## Servicing Timers
//!
//! Timers never fire by themselves. Either call
//! [`Dispatcher::run_due_timers`] from the host's event loop (pair it with
//! [`ManualClock`] for a virtual timeline), or start the tokio driver:
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! # async fn example() {
//! use toast_dispatch::{DispatcherBuilder, NotificationChannel};
//!
//! let channel = NotificationChannel::new();
//! let dispatcher = DispatcherBuilder::new().build(&channel).unwrap();
//! let driver = dispatcher.spawn_driver();
//!
//! channel.info("Saved");
//!
//! driver.shutdown().await.expect("driver shutdown failed");
//! # }
//! ```
//!
//! ## Eviction Strategies
//!
//! - [`EvictionStrategy::Oldest`] (default): evict the oldest entry,
//!   persistent or not
//! - [`EvictionStrategy::PersistentExempt`]: prefer the oldest non-persistent
//!   entry, falling back to the oldest when only persistent ones remain
//!
//! Custom policies implement [`EvictionPolicy`] and are installed with
//! [`DispatcherBuilder::with_eviction_policy`].
//!
//! ## Observability
//!
//! Admissions, evictions, expiries, removals and teardown are logged at
//! `DEBUG` through `tracing`; timer servicing at `TRACE`. Suppressed
//! duplicates are never logged. [`Dispatcher::metrics`] exposes counters:
//!
//! ```rust
//! use toast_dispatch::{DispatcherBuilder, NotificationChannel};
//!
//! let channel = NotificationChannel::new();
//! let dispatcher = DispatcherBuilder::new().build(&channel).unwrap();
//!
//! channel.error("boom");
//! channel.error("boom");
//!
//! let snapshot = dispatcher.metrics().snapshot();
//! assert_eq!(snapshot.notifications_admitted, 1);
//! assert_eq!(snapshot.duplicates_suppressed, 1);
//! ```

// Domain layer - pure notification types
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    dedup_key::DedupKey,
    notification::{Notification, NotificationId},
    request::{Action, Category, NotificationPatch, NotificationRequest},
};

pub use application::{
    channel::{Handler, NotificationChannel, Subscription},
    dispatcher::{Dispatcher, Presenter},
    gate::DedupGate,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, EvictionCandidate, EvictionPolicy, Storage},
    store::{NotificationStore, StoreConfig},
    timers::{TimerId, TimerQueue},
};

#[cfg(feature = "async")]
pub use application::driver::{DriverHandle, ShutdownError};

pub use infrastructure::{
    builder::{BuildError, DispatcherBuilder},
    clock::{ManualClock, SystemClock},
    eviction::{EvictionStrategy, OldestEviction, PersistentExemptEviction},
    layer::NotificationLayer,
    storage::ShardedStorage,
};

#[cfg(feature = "async")]
pub use infrastructure::clock::TokioClock;

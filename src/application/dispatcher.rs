//! The dispatcher: the single subscriber bridging the channel to the store.
//!
//! Every request received from the channel goes through the deduplication
//! gate. Survivors are added to the store; duplicates are dropped without any
//! observable effect. Gate and store live behind one mutex, so each publish,
//! timer step and dismissal is applied atomically and in arrival order.

use crate::application::channel::{NotificationChannel, Subscription};
use crate::application::gate::DedupGate;
use crate::application::metrics::Metrics;
use crate::application::ports::Clock;
use crate::application::store::NotificationStore;
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::request::{NotificationPatch, NotificationRequest};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Debug)]
pub(crate) struct DispatchState {
    gate: DedupGate,
    store: NotificationStore,
    torn_down: bool,
}

impl DispatchState {
    fn fire_due(&mut self, now: Instant) -> usize {
        self.gate.fire_due(now) + self.store.fire_due(now)
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.gate.next_deadline(), self.store.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

pub(crate) struct Shared {
    state: Mutex<DispatchState>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
    #[cfg(feature = "async")]
    pub(crate) wake: tokio::sync::Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wake(&self) {
        #[cfg(feature = "async")]
        self.wake.notify_one();
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    fn receive(&self, request: &NotificationRequest) -> Option<NotificationId> {
        let now = self.clock.now();
        let id = {
            let mut state = self.lock();
            if state.torn_down {
                return None;
            }
            state.fire_due(now);
            if !state.gate.admit(request, now) {
                self.metrics.record_suppressed();
                return None;
            }
            state.store.add(request.clone(), now)
        };

        self.metrics.record_admitted();
        debug!(id = %id, category = %request.category, "notification admitted");
        self.wake();
        Some(id)
    }

    pub(crate) fn run_due(&self) -> usize {
        let now = self.clock.now();
        let fired = {
            let mut state = self.lock();
            if state.torn_down {
                return 0;
            }
            state.fire_due(now)
        };
        if fired > 0 {
            trace!(fired, "serviced notification timers");
        }
        fired
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        let state = self.lock();
        if state.torn_down {
            return None;
        }
        state.next_deadline()
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.lock().torn_down
    }

    fn dismiss(&self, id: NotificationId) -> bool {
        let now = self.clock.now();
        let dismissed = {
            let mut state = self.lock();
            if state.torn_down {
                return false;
            }
            state.fire_due(now);
            state.store.dismiss(id, now)
        };
        if dismissed {
            debug!(id = %id, "notification dismissed");
            self.wake();
        }
        dismissed
    }

    fn dismiss_all(&self) -> usize {
        let now = self.clock.now();
        let dismissed = {
            let mut state = self.lock();
            if state.torn_down {
                return 0;
            }
            state.fire_due(now);
            state.store.dismiss_all(now)
        };
        if dismissed > 0 {
            debug!(count = dismissed, "notifications dismissed");
            self.wake();
        }
        dismissed
    }

    fn snapshot(&self) -> Vec<Notification> {
        self.lock().store.snapshot()
    }

    fn revision(&self) -> u64 {
        self.lock().store.revision()
    }
}

/// Bridges a [`NotificationChannel`] to a bounded notification store.
///
/// Created by [`DispatcherBuilder`](crate::DispatcherBuilder). The dispatcher
/// subscribes on construction and unsubscribes on [`Dispatcher::teardown`] or
/// drop. Timers are serviced by [`Dispatcher::run_due_timers`], or by the
/// tokio driver started with `spawn_driver` when the `async` feature is on.
pub struct Dispatcher {
    shared: Arc<Shared>,
    subscription: Option<Subscription>,
}

impl Dispatcher {
    /// Subscribe a new dispatcher to `channel`.
    pub fn new(
        channel: &NotificationChannel,
        gate: DedupGate,
        store: NotificationStore,
        clock: Arc<dyn Clock>,
        metrics: Metrics,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(DispatchState {
                gate,
                store: store.with_metrics(metrics.clone()),
                torn_down: false,
            }),
            clock,
            metrics,
            #[cfg(feature = "async")]
            wake: tokio::sync::Notify::new(),
        });

        let receiver = Arc::clone(&shared);
        let subscription = channel.subscribe(move |request: &NotificationRequest| {
            receiver.receive(request);
        });

        Self {
            shared,
            subscription: Some(subscription),
        }
    }

    /// Push a request through the gate directly, bypassing the channel.
    ///
    /// Returns the id of the new notification, or `None` when the request
    /// was suppressed as a duplicate or the dispatcher is torn down.
    pub fn dispatch(&self, request: NotificationRequest) -> Option<NotificationId> {
        self.shared.receive(&request)
    }

    /// Merge a patch into an active notification.
    ///
    /// Returns `false` if the notification is no longer active.
    pub fn update(&self, id: NotificationId, patch: NotificationPatch) -> bool {
        let mut state = self.shared.lock();
        if state.torn_down {
            return false;
        }
        state.store.update(id, patch)
    }

    /// Start the exit transition of a notification.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.shared.dismiss(id)
    }

    /// Start the exit transition of every visible notification.
    pub fn dismiss_all(&self) -> usize {
        self.shared.dismiss_all()
    }

    /// Run every gate expiry and lifecycle step that is due.
    ///
    /// Returns the number of timers that fired.
    pub fn run_due_timers(&self) -> usize {
        self.shared.run_due()
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.shared.next_deadline()
    }

    /// Number of pending timers across the gate and the store.
    pub fn pending_timers(&self) -> usize {
        let state = self.shared.lock();
        state.gate.pending_count() + state.store.pending_timers()
    }

    /// Number of dedup keys currently suppressing duplicates.
    pub fn pending_keys(&self) -> usize {
        self.shared.lock().gate.pending_count()
    }

    /// Owned copy of the active notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.shared.snapshot()
    }

    /// Handle for the presentation layer.
    pub fn presenter(&self) -> Presenter {
        Presenter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Dispatch counters.
    pub fn metrics(&self) -> &Metrics {
        &self.shared.metrics
    }

    /// Whether [`Dispatcher::teardown`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.shared.is_torn_down()
    }

    /// Unsubscribe from the channel and cancel every pending timer.
    ///
    /// The store keeps its contents for a final read, but nothing mutates it
    /// afterwards. Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        let cancelled = {
            let mut state = self.shared.lock();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            state.gate.cancel_all() + state.store.cancel_all()
        };

        self.shared.wake();
        debug!(cancelled, "dispatcher torn down");
    }

    #[cfg(feature = "async")]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &*self.shared.lock())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

/// Read and dismiss handle for the presentation layer.
///
/// Cheap to clone. All clones observe the same store.
#[derive(Clone)]
pub struct Presenter {
    shared: Arc<Shared>,
}

impl Presenter {
    /// Active notifications in render order, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.shared.snapshot()
    }

    /// User-initiated close.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.shared.dismiss(id)
    }

    /// Close everything.
    pub fn dismiss_all(&self) -> usize {
        self.shared.dismiss_all()
    }

    /// Counter bumped on every change to the store.
    ///
    /// Compare against a previously seen value to decide whether to re-render.
    pub fn revision(&self) -> u64 {
        self.shared.revision()
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("revision", &self.revision())
            .finish()
    }
}

//! Notification store.
//!
//! Holds the ordered, bounded set of active notifications and drives their
//! lifecycle: `Visible → ExitRequested → Removed`.

use crate::application::metrics::Metrics;
use crate::application::ports::{EvictionCandidate, EvictionPolicy};
use crate::application::timers::{TimerId, TimerQueue};
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::request::{NotificationPatch, NotificationRequest};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Limits and delays applied by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of notifications held at once, exiting ones included
    pub max_visible: usize,
    /// Time before a non-persistent notification is dismissed automatically
    pub default_lifetime: Duration,
    /// Time between dismissal and removal; zero removes immediately
    pub exit_delay: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            default_lifetime: Duration::from_secs(5),
            exit_delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    AutoDismiss(NotificationId),
    Remove(NotificationId),
}

#[derive(Debug)]
struct Entry {
    notification: Notification,
    // auto-dismiss while visible, removal while exiting
    timer: Option<TimerId>,
}

/// Ordered set of active notifications, oldest first.
#[derive(Debug)]
pub struct NotificationStore {
    config: StoreConfig,
    eviction: Arc<dyn EvictionPolicy>,
    metrics: Metrics,
    active: VecDeque<Entry>,
    timers: TimerQueue<Lifecycle>,
    next_id: u64,
    revision: u64,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig, eviction: Arc<dyn EvictionPolicy>) -> Self {
        Self {
            config,
            eviction,
            metrics: Metrics::new(),
            active: VecDeque::new(),
            timers: TimerQueue::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Record evictions and expiries into shared metrics.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Admit a request as a new notification at the tail.
    ///
    /// Schedules an automatic dismissal unless the request is persistent, then
    /// evicts until the capacity bound holds again. The new notification is
    /// never chosen as the eviction victim.
    pub fn add(&mut self, request: NotificationRequest, now: Instant) -> NotificationId {
        let id = NotificationId::from_raw(self.next_id);
        self.next_id += 1;

        // A lifetime reaching past the end of `Instant` never expires.
        let timer = if request.is_persistent() {
            None
        } else {
            let lifetime = request.lifetime.unwrap_or(self.config.default_lifetime);
            now.checked_add(lifetime)
                .map(|deadline| self.timers.schedule(deadline, Lifecycle::AutoDismiss(id)))
        };

        self.active.push_back(Entry {
            notification: Notification::new(id, request, now),
            timer,
        });

        while self.active.len() > self.config.max_visible.max(1) {
            self.evict_one();
        }

        self.revision += 1;
        id
    }

    /// Merge a patch into an active notification.
    ///
    /// Returns `false` without doing anything if the id is no longer active.
    /// Attaching an action to a visible notification makes it persistent and
    /// cancels its automatic dismissal.
    pub fn update(&mut self, id: NotificationId, patch: NotificationPatch) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.notification.apply(patch);
        let cancel = if entry.notification.is_visible() && entry.notification.is_persistent() {
            entry.timer.take()
        } else {
            None
        };
        if let Some(timer) = cancel {
            self.timers.cancel(timer);
        }
        self.revision += 1;
        true
    }

    /// Start the exit transition of a notification.
    ///
    /// The notification is hidden now and removed after the exit delay, or
    /// immediately when the delay is zero. Returns `false` if the id is
    /// unknown or already exiting.
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) -> bool {
        let exit_delay = self.config.exit_delay;
        let Some(entry) = self
            .active
            .iter_mut()
            .find(|entry| entry.notification.id() == id)
        else {
            return false;
        };
        if !entry.notification.is_visible() {
            return false;
        }

        entry.notification.hide();
        if let Some(timer) = entry.timer.take() {
            self.timers.cancel(timer);
        }

        if exit_delay.is_zero() {
            self.remove(id);
        } else if let Some(deadline) = now.checked_add(exit_delay) {
            let timer = self.timers.schedule(deadline, Lifecycle::Remove(id));
            if let Some(entry) = self.entry_mut(id) {
                entry.timer = Some(timer);
            }
        }

        self.revision += 1;
        true
    }

    /// Dismiss every visible notification. Returns how many were dismissed.
    pub fn dismiss_all(&mut self, now: Instant) -> usize {
        let visible: Vec<NotificationId> = self
            .active
            .iter()
            .filter(|entry| entry.notification.is_visible())
            .map(|entry| entry.notification.id())
            .collect();

        visible
            .into_iter()
            .filter(|id| self.dismiss(*id, now))
            .count()
    }

    /// Run every lifecycle step due at or before `now`.
    ///
    /// Returns the number of steps that ran.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((timer, step)) = self.timers.pop_due(now) {
            fired += 1;
            match step {
                Lifecycle::AutoDismiss(id) => {
                    if let Some(entry) = self.entry_mut(id) {
                        if entry.timer == Some(timer) {
                            entry.timer = None;
                        }
                    }
                    if self.dismiss(id, now) {
                        self.metrics.record_expired();
                        debug!(id = %id, "notification expired");
                    }
                }
                Lifecycle::Remove(id) => {
                    self.remove(id);
                }
            }
        }
        fired
    }

    /// Cancel every pending lifecycle step. Returns how many were cancelled.
    ///
    /// Notifications stay in the store in whatever state they were in.
    pub fn cancel_all(&mut self) -> usize {
        for entry in self.active.iter_mut() {
            entry.timer = None;
        }
        self.timers.cancel_all()
    }

    /// Active notifications in insertion order, oldest first.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.active.iter().map(|entry| &entry.notification)
    }

    /// Owned copy of the active notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.notifications().cloned().collect()
    }

    /// Look up an active notification.
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications().find(|n| n.id() == id)
    }

    /// Number of notifications held, exiting ones included.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check if the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Counter bumped on every observable change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Earliest pending lifecycle step.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of pending lifecycle steps.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn entry_mut(&mut self, id: NotificationId) -> Option<&mut Entry> {
        self.active
            .iter_mut()
            .find(|entry| entry.notification.id() == id)
    }

    fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let pos = self
            .active
            .iter()
            .position(|entry| entry.notification.id() == id)?;
        let entry = self.active.remove(pos)?;
        if let Some(timer) = entry.timer {
            self.timers.cancel(timer);
        }
        self.revision += 1;
        debug!(id = %id, "notification removed");
        Some(entry.notification)
    }

    fn evict_one(&mut self) {
        // The newest entry is never a candidate.
        let candidates: Vec<EvictionCandidate> = self
            .active
            .iter()
            .take(self.active.len().saturating_sub(1))
            .map(|entry| EvictionCandidate {
                id: entry.notification.id(),
                created_at: entry.notification.created_at(),
                persistent: entry.notification.is_persistent(),
                visible: entry.notification.is_visible(),
            })
            .collect();

        let victim = self
            .eviction
            .select_victim(&candidates)
            .filter(|id| candidates.iter().any(|c| c.id == *id))
            .or_else(|| candidates.first().map(|c| c.id));

        if let Some(id) = victim {
            if self.remove(id).is_some() {
                self.metrics.record_evicted();
                debug!(id = %id, "notification evicted");
            }
        }
    }
}

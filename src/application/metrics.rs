//! Dispatch counters.
//!
//! Counts what happened to published requests. Counters are internal
//! observability only and never surface to the end user.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking dispatch statistics.
///
/// All metrics use atomic operations, so a clone handed to a monitoring task
/// can be read while the dispatcher keeps running.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Requests that passed the gate and were added to the store
    notifications_admitted: AtomicU64,
    /// Requests dropped as duplicates
    duplicates_suppressed: AtomicU64,
    /// Notifications removed to respect the capacity bound
    notifications_evicted: AtomicU64,
    /// Notifications dismissed by their lifetime timer
    notifications_expired: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                notifications_admitted: AtomicU64::new(0),
                duplicates_suppressed: AtomicU64::new(0),
                notifications_evicted: AtomicU64::new(0),
                notifications_expired: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_admitted(&self) {
        self.inner
            .notifications_admitted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.inner
            .duplicates_suppressed
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evicted(&self) {
        self.inner
            .notifications_evicted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self) {
        self.inner
            .notifications_expired
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get the number of admitted notifications.
    pub fn notifications_admitted(&self) -> u64 {
        self.inner.notifications_admitted.load(Ordering::Relaxed)
    }

    /// Get the number of suppressed duplicates.
    pub fn duplicates_suppressed(&self) -> u64 {
        self.inner.duplicates_suppressed.load(Ordering::Relaxed)
    }

    /// Get the number of evicted notifications.
    pub fn notifications_evicted(&self) -> u64 {
        self.inner.notifications_evicted.load(Ordering::Relaxed)
    }

    /// Get the number of notifications dismissed by timeout.
    pub fn notifications_expired(&self) -> u64 {
        self.inner.notifications_expired.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            notifications_admitted: self.notifications_admitted(),
            duplicates_suppressed: self.duplicates_suppressed(),
            notifications_evicted: self.notifications_evicted(),
            notifications_expired: self.notifications_expired(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.notifications_admitted.store(0, Ordering::Relaxed);
        self.inner.duplicates_suppressed.store(0, Ordering::Relaxed);
        self.inner.notifications_evicted.store(0, Ordering::Relaxed);
        self.inner.notifications_expired.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Requests that passed the gate and were added to the store
    pub notifications_admitted: u64,
    /// Requests dropped as duplicates
    pub duplicates_suppressed: u64,
    /// Notifications removed to respect the capacity bound
    pub notifications_evicted: u64,
    /// Notifications dismissed by their lifetime timer
    pub notifications_expired: u64,
}

impl MetricsSnapshot {
    /// Total number of requests that reached the gate.
    pub fn total_requests(&self) -> u64 {
        self.notifications_admitted
            .saturating_add(self.duplicates_suppressed)
    }

    /// Ratio of suppressed duplicates to all requests (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been published.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.duplicates_suppressed as f64 / total as f64
        }
    }
}

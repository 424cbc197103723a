//! Deduplication gate.
//!
//! The gate remembers which dedup keys were admitted recently. A request
//! whose key is still pending is suppressed; the key is forgotten when its
//! expiry timer fires, `debounce_window` after admission. A window reaching
//! past the end of `Instant` never expires; such keys are released only by
//! `cancel_all`.

use crate::application::ports::Storage;
use crate::application::timers::TimerQueue;
use crate::domain::{dedup_key::DedupKey, request::NotificationRequest};
use std::fmt;
use std::time::{Duration, Instant};

/// Suppresses repeats of the same dedup key within a time window.
///
/// The expiry of a key is fixed when it is admitted. Suppressed repeats do
/// not extend it. Keys whose expiry has passed are honoured on the next
/// `admit` even if [`DedupGate::fire_due`] has not been called yet.
pub struct DedupGate {
    window: Duration,
    pending: Box<dyn Storage<DedupKey, ()>>,
    expiries: TimerQueue<DedupKey>,
}

impl DedupGate {
    /// Create a gate over the given key storage.
    pub fn new(pending: Box<dyn Storage<DedupKey, ()>>, window: Duration) -> Self {
        Self {
            window,
            pending,
            expiries: TimerQueue::new(),
        }
    }

    /// Decide whether a request passes.
    ///
    /// Returns `true` and records the key if no identical key is pending.
    /// Returns `false` otherwise. Among requests arriving at the same
    /// instant, the first one wins.
    pub fn admit(&mut self, request: &NotificationRequest, now: Instant) -> bool {
        self.fire_due(now);

        let key = request.dedup_key();
        if self.pending.contains_key(&key) {
            return false;
        }

        if let Some(deadline) = now.checked_add(self.window) {
            self.expiries.schedule(deadline, key);
        }
        self.pending.insert(key, ());
        true
    }

    /// Forget every key whose expiry is at or before `now`.
    ///
    /// Returns the number of keys released.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut released = 0;
        while let Some((_, key)) = self.expiries.pop_due(now) {
            if self.pending.remove(&key).is_some() {
                released += 1;
            }
        }
        released
    }

    /// Cancel every pending expiry and forget every key.
    ///
    /// Returns the number of expiries cancelled.
    pub fn cancel_all(&mut self) -> usize {
        self.pending.clear();
        self.expiries.cancel_all()
    }

    /// Whether a key is currently suppressing duplicates.
    pub fn is_pending(&self, key: &DedupKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of keys currently suppressing duplicates.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending expiry.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiries.next_deadline()
    }

    /// The debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl fmt::Debug for DedupGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupGate")
            .field("window", &self.window)
            .field("pending", &self.pending.len())
            .field("expiries", &self.expiries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::ShardedStorage;

    fn gate(window_ms: u64) -> DedupGate {
        DedupGate::new(
            Box::new(ShardedStorage::new()),
            Duration::from_millis(window_ms),
        )
    }

    #[test]
    fn test_duplicates_within_window_suppressed() {
        let mut gate = gate(500);
        let start = Instant::now();
        let request = NotificationRequest::error("Failed to load buses");

        assert!(gate.admit(&request, start));
        assert!(!gate.admit(&request, start));
        assert!(!gate.admit(&request, start + Duration::from_millis(100)));
        assert!(!gate.admit(&request, start + Duration::from_millis(499)));
        assert_eq!(gate.pending_count(), 1);
    }

    #[test]
    fn test_admits_again_after_window() {
        let mut gate = gate(500);
        let start = Instant::now();
        let request = NotificationRequest::error("Failed to load buses");

        assert!(gate.admit(&request, start));
        assert!(gate.admit(&request, start + Duration::from_millis(600)));
    }

    #[test]
    fn test_admits_exactly_at_window_boundary() {
        let mut gate = gate(500);
        let start = Instant::now();
        let request = NotificationRequest::info("Saved");

        assert!(gate.admit(&request, start));
        assert!(gate.admit(&request, start + Duration::from_millis(500)));
    }

    #[test]
    fn test_suppressed_repeat_does_not_extend_window() {
        let mut gate = gate(500);
        let start = Instant::now();
        let request = NotificationRequest::info("Saved");

        assert!(gate.admit(&request, start));
        assert!(!gate.admit(&request, start + Duration::from_millis(400)));
        assert!(gate.admit(&request, start + Duration::from_millis(550)));
    }

    #[test]
    fn test_distinct_keys_are_independent() {
        let mut gate = gate(500);
        let now = Instant::now();

        assert!(gate.admit(&NotificationRequest::error("a"), now));
        assert!(gate.admit(&NotificationRequest::error("b"), now));
        assert!(gate.admit(&NotificationRequest::info("a"), now));
        assert_eq!(gate.pending_count(), 3);
    }

    #[test]
    fn test_fire_due_releases_keys() {
        let mut gate = gate(500);
        let start = Instant::now();
        gate.admit(&NotificationRequest::error("a"), start);
        gate.admit(&NotificationRequest::error("b"), start + Duration::from_millis(300));

        assert_eq!(gate.next_deadline(), Some(start + Duration::from_millis(500)));
        assert_eq!(gate.fire_due(start + Duration::from_millis(500)), 1);
        assert_eq!(gate.pending_count(), 1);
        assert_eq!(gate.fire_due(start + Duration::from_millis(800)), 1);
        assert_eq!(gate.pending_count(), 0);
        assert_eq!(gate.next_deadline(), None);
    }

    #[test]
    fn test_unrepresentable_window_suppresses_without_expiry() {
        let mut gate = DedupGate::new(Box::new(ShardedStorage::new()), Duration::MAX);
        let start = Instant::now();
        let request = NotificationRequest::info("x");

        assert!(gate.admit(&request, start));
        assert!(!gate.admit(&request, start + Duration::from_secs(3_600)));
        assert_eq!(gate.next_deadline(), None);
        assert_eq!(gate.pending_count(), 1);

        assert_eq!(gate.cancel_all(), 0);
        assert!(gate.admit(&request, start));
    }

    #[test]
    fn test_cancel_all_forgets_keys() {
        let mut gate = gate(500);
        let now = Instant::now();
        let request = NotificationRequest::error("a");
        gate.admit(&request, now);
        gate.admit(&NotificationRequest::error("b"), now);

        assert_eq!(gate.cancel_all(), 2);
        assert_eq!(gate.pending_count(), 0);
        assert_eq!(gate.next_deadline(), None);
        assert!(!gate.is_pending(&request.dedup_key()));
        assert!(gate.admit(&request, now));
    }
}

//! Eviction strategies for the notification store.
//!
//! When an admission pushes the store past `max_visible`, the store asks an
//! [`EvictionPolicy`] to pick a victim among every notification except the
//! one just added. Candidates arrive oldest first.

use crate::application::ports::{EvictionCandidate, EvictionPolicy};
use crate::domain::notification::NotificationId;
use std::sync::Arc;

/// Eviction strategy selected through the builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionStrategy {
    /// Evict the oldest notification, whether visible, exiting or
    /// persistent. This is the default.
    #[default]
    Oldest,

    /// Prefer the oldest non-persistent notification.
    ///
    /// Notifications with an action, or explicitly marked persistent, are
    /// skipped while anything else is available. When every candidate is
    /// persistent the store still evicts the oldest one, so the bound holds.
    PersistentExempt,
}

impl EvictionStrategy {
    /// Build the policy implementing this strategy.
    pub fn into_policy(self) -> Arc<dyn EvictionPolicy> {
        match self {
            EvictionStrategy::Oldest => Arc::new(OldestEviction::new()),
            EvictionStrategy::PersistentExempt => Arc::new(PersistentExemptEviction::new()),
        }
    }
}

/// Evicts the oldest candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct OldestEviction;

impl OldestEviction {
    /// Create the default eviction policy.
    pub fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for OldestEviction {
    fn select_victim(&self, candidates: &[EvictionCandidate]) -> Option<NotificationId> {
        candidates.first().map(|candidate| candidate.id)
    }
}

/// Evicts the oldest candidate that is not persistent.
///
/// Returns `None` when all candidates are persistent; the store then falls
/// back to the oldest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistentExemptEviction;

impl PersistentExemptEviction {
    /// Create a policy that spares persistent notifications when it can.
    pub fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for PersistentExemptEviction {
    fn select_victim(&self, candidates: &[EvictionCandidate]) -> Option<NotificationId> {
        candidates
            .iter()
            .find(|candidate| !candidate.persistent)
            .map(|candidate| candidate.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn candidate(id: u64, persistent: bool) -> EvictionCandidate {
        EvictionCandidate {
            id: NotificationId::from_raw(id),
            created_at: Instant::now(),
            persistent,
            visible: true,
        }
    }

    #[test]
    fn test_oldest_picks_first() {
        let policy = OldestEviction::new();
        let candidates = [candidate(1, true), candidate(2, false)];

        assert_eq!(
            policy.select_victim(&candidates),
            Some(NotificationId::from_raw(1))
        );
        assert_eq!(policy.select_victim(&[]), None);
    }

    #[test]
    fn test_persistent_exempt_skips_persistent() {
        let policy = PersistentExemptEviction::new();
        let candidates = [candidate(1, true), candidate(2, true), candidate(3, false)];

        assert_eq!(
            policy.select_victim(&candidates),
            Some(NotificationId::from_raw(3))
        );
    }

    #[test]
    fn test_persistent_exempt_all_persistent() {
        let policy = PersistentExemptEviction::new();
        let candidates = [candidate(1, true), candidate(2, true)];

        assert_eq!(policy.select_victim(&candidates), None);
    }

    #[test]
    fn test_strategy_default_is_oldest() {
        assert_eq!(EvictionStrategy::default(), EvictionStrategy::Oldest);

        let policy = EvictionStrategy::PersistentExempt.into_policy();
        let candidates = [candidate(1, true), candidate(2, false)];
        assert_eq!(
            policy.select_victim(&candidates),
            Some(NotificationId::from_raw(2))
        );
    }
}

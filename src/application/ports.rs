//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::notification::NotificationId;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, ManualClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for the key set kept by the deduplication gate.
///
/// Infrastructure provides the concrete implementation (ShardedStorage).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Check if a key is present.
    fn contains_key(&self, key: &K) -> bool;

    /// Insert a value, returning the previous one.
    fn insert(&self, key: K, value: V) -> Option<V>;

    /// Remove a key and return its value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Clear all entries from the storage.
    fn clear(&self);
}

/// Candidate notification for eviction consideration.
///
/// Candidates are always presented in arrival order, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionCandidate {
    /// Id of the notification
    pub id: NotificationId,
    /// Admission time
    pub created_at: Instant,
    /// Whether the notification is exempt from automatic expiry
    pub persistent: bool,
    /// False once the exit transition has started
    pub visible: bool,
}

/// Port for choosing which notification leaves when the store is full.
///
/// If the policy returns `None`, or an id that is not among the candidates,
/// the store falls back to evicting the oldest entry so the capacity bound
/// always holds.
pub trait EvictionPolicy: Send + Sync + Debug {
    /// Select a victim from the given candidates.
    fn select_victim(&self, candidates: &[EvictionCandidate]) -> Option<NotificationId>;
}

//! Cancellable deferred tasks.
//!
//! Debounce expiries and notification lifecycle steps are scheduled here
//! rather than as free-running callbacks, so every outstanding task has an id
//! and teardown can cancel all of them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Deadline-ordered queue of pending tasks.
///
/// Tasks sharing a deadline fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    by_deadline: BTreeMap<(Instant, TimerId), T>,
    deadlines: HashMap<TimerId, Instant>,
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_deadline: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `task` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.by_deadline.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.by_deadline.remove(&(deadline, id))
    }

    /// Cancel every pending task and return how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.by_deadline.len();
        self.by_deadline.clear();
        self.deadlines.clear();
        cancelled
    }

    /// Remove and return the earliest task whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, T)> {
        let (&(deadline, id), _) = self.by_deadline.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.by_deadline
            .remove(&(deadline, id))
            .map(|task| (id, task))
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.by_deadline.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Deadline of a specific task, if it is still pending.
    pub fn deadline_of(&self, id: TimerId) -> Option<Instant> {
        self.deadlines.get(&id).copied()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    /// Check if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

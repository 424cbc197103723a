//! Clock adapters for time operations.
//!
//! - `SystemClock` reads `Instant::now()` and is the production default.
//! - `ManualClock` only moves when told to. Hosts that drive timers from a
//!   virtual timeline (and tests) use it with `Dispatcher::run_due_timers`.
//! - `TokioClock` follows tokio's clock, including paused time, and pairs
//!   with the tokio timer driver (`async` feature).

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock whose time only changes through [`ManualClock::advance`] and
/// [`ManualClock::set`].
///
/// All clones share the same underlying time value, so advancing one clone
/// advances them all.
///
/// # Examples
///
/// ```
/// use toast_dispatch::{Clock, ManualClock};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = ManualClock::new(start);
/// let shared = clock.clone();
///
/// clock.advance(Duration::from_millis(600));
/// assert_eq!(shared.now(), start + Duration::from_millis(600));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    current_time: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut time = self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *time += duration;
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: Instant) {
        let mut time = self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *time = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self
            .current_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clock backed by `tokio::time::Instant`, so paused test runtimes control it.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[cfg(feature = "async")]
impl TokioClock {
    /// Create a new tokio clock.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "async")]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
    }

    #[test]
    fn test_manual_clock() {
        let start = Instant::now();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        let new_time = start + Duration::from_secs(100);
        clock.set(new_time);
        assert_eq!(clock.now(), new_time);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let start = Instant::now();
        let clock = ManualClock::new(start);
        let clone = clock.clone();

        let handle = std::thread::spawn(move || {
            clone.advance(Duration::from_secs(5));
        });
        handle.join().unwrap();

        assert_eq!(clock.now(), start + Duration::from_secs(5));
    }

    #[cfg(feature = "async")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        let t1 = clock.now();
        tokio::time::sleep(Duration::from_secs(30)).await;
        let t2 = clock.now();

        assert_eq!(t2 - t1, Duration::from_secs(30));
    }
}

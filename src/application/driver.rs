//! Tokio task that services dispatcher timers.
//!
//! The driver sleeps until the earliest pending deadline, runs whatever is
//! due, and goes back to sleep. New admissions and dismissals wake it early
//! so a freshly scheduled, earlier deadline is never missed.
//!
//! The driver compares deadlines against the dispatcher's clock and sleeps on
//! tokio's timer, so the two must agree: use `SystemClock` in a normal
//! runtime, or `TokioClock` when the runtime's time is paused in tests.

use crate::application::dispatcher::{Dispatcher, Shared};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

/// Error returned when the driver task fails to shut down gracefully.
#[derive(Debug)]
pub enum ShutdownError {
    /// The driver task panicked
    TaskPanicked,
    /// The driver task was cancelled from outside
    TaskCancelled,
}

impl std::fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownError::TaskPanicked => write!(f, "timer driver task panicked"),
            ShutdownError::TaskCancelled => write!(f, "timer driver task was cancelled"),
        }
    }
}

impl std::error::Error for ShutdownError {}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    notify: Notify,
}

/// Handle to a running timer driver.
///
/// Dropping the handle detaches the task; it keeps running until the
/// dispatcher is torn down. Call [`DriverHandle::shutdown`] to stop it early.
#[derive(Debug)]
pub struct DriverHandle {
    signal: Arc<StopSignal>,
    join: JoinHandle<()>,
}

impl DriverHandle {
    /// Stop the driver and wait for the task to finish.
    ///
    /// # Errors
    /// Returns `ShutdownError` if the task panicked or was aborted.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        self.signal.stopped.store(true, Ordering::Release);
        self.signal.notify.notify_one();

        match self.join.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_panic() => Err(ShutdownError::TaskPanicked),
            Err(_) => Err(ShutdownError::TaskCancelled),
        }
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Dispatcher {
    /// Start a tokio task that services this dispatcher's timers.
    ///
    /// The task exits on [`DriverHandle::shutdown`] or when the dispatcher
    /// is torn down.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn_driver(&self) -> DriverHandle {
        let signal = Arc::new(StopSignal::default());
        let join = tokio::spawn(run(Arc::clone(self.shared()), Arc::clone(&signal)));
        DriverHandle { signal, join }
    }
}

async fn run(shared: Arc<Shared>, signal: Arc<StopSignal>) {
    loop {
        if signal.stopped.load(Ordering::Acquire) || shared.is_torn_down() {
            break;
        }

        shared.run_due();

        let sleep = async {
            match shared.next_deadline() {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = signal.notify.notified() => {}
            _ = shared.wake.notified() => {}
            _ = sleep => {}
        }
    }
    debug!("notification timer driver stopped");
}

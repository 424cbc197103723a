//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types and owns the runtime behavior:
//! - Notification channel (publish/subscribe)
//! - Deduplication gate (suppression window per key)
//! - Notification store (bounded active set and lifecycle timers)
//! - Dispatcher (wires channel, gate and store together)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod channel;
pub mod dispatcher;
#[cfg(feature = "async")]
pub mod driver;
pub mod gate;
pub mod metrics;
pub mod ports;
pub mod store;
pub mod timers;

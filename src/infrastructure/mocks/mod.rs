//! Mock implementations for testing.
//!
//! Only the log capture lives here. Deterministic time is provided by the
//! public `ManualClock`, which hosts may use in production too.

pub mod layer;

pub use layer::{CapturedEvent, MockCaptureLayer};

//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system, manual and tokio time)
//! - Storage implementations (sharded maps)
//! - Eviction strategies
//! - Dispatcher construction (builder)
//! - Tracing integration (Layer trait)

pub mod builder;
pub mod clock;
pub mod eviction;
pub mod layer;
pub mod storage;
pub(crate) mod visitor;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// toast-dispatch = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;

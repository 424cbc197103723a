//! Domain layer - pure notification types with no runtime behavior.
//!
//! This layer contains the core concepts of the notification system:
//! - Requests as published by collaborators
//! - Admitted notifications and their ids
//! - Deduplication key computation
//!
//! All types in this layer are pure and easily testable.

pub mod dedup_key;
pub mod notification;
pub mod request;

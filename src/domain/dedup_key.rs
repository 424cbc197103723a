//! Deduplication key computation.
//!
//! A dedup key identifies a class of notifications that should collapse into
//! one when published repeatedly inside the debounce window. It is built from:
//! - The category
//! - The description, or the title when no description is present
//!
//! The title is ignored whenever a description exists, so two requests that
//! differ only in title share a key.

use crate::domain::request::{Category, NotificationRequest};
use ahash::AHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Hash identifying near-duplicate notification requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(u64);

impl DedupKey {
    /// Compute a key from a category and the text that identifies the message.
    pub fn new(category: Category, text: &str) -> Self {
        let mut hasher = AHasher::default();

        category.as_str().hash(&mut hasher);
        text.hash(&mut hasher);

        DedupKey(hasher.finish())
    }

    /// Compute the key of a request.
    ///
    /// Uses the description when present, falls back to the title, and to the
    /// empty string when both are missing.
    pub fn for_request(request: &NotificationRequest) -> Self {
        let text = request
            .description
            .as_deref()
            .or(request.title.as_deref())
            .unwrap_or("");
        Self::new(request.category, text)
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

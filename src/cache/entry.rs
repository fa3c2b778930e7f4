//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single cache entry: caller-owned value plus mutation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Last mutation timestamp (Unix milliseconds), informational only
    pub last_modified: u64,
}

impl<T> CacheEntry<T> {
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: T) -> Self {
        Self {
            value,
            last_modified: current_timestamp_ms(),
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

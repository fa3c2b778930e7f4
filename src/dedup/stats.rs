//! Deduplication Statistics Module
//!
//! Counters for cache effectiveness plus live table gauges.

use serde::Serialize;

// == Dedup Stats ==
/// Deduplication cache metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupStats {
    /// Requests served from a fresh resolved entry
    pub hits: u64,
    /// Requests attached to an already-running computation
    pub coalesced: u64,
    /// Computations started (leader admissions)
    pub started: u64,
    /// Resolved entries removed after their TTL elapsed
    pub expired: u64,
    /// Computations currently running
    pub in_flight: usize,
    /// Resolved entries currently held
    pub resolved: usize,
}

impl DedupStats {
    /// Fraction of admissions avoided (hit or coalesced) out of all admissions.
    pub fn dedup_rate(&self) -> f64 {
        let avoided = self.hits + self.coalesced;
        let total = avoided + self.started;
        if total == 0 {
            0.0
        } else {
            avoided as f64 / total as f64
        }
    }
}

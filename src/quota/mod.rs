//! Quota Module
//!
//! Per-user rolling-window rate limiting on top of the durable cache.

mod record;
mod tracker;

// Re-export public types
pub use record::QuotaRecord;
pub use tracker::{QuotaDecision, QuotaTracker, QuotaUsage};

//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service
//! operation.
//!
//! # Tasks
//! - Flush: persists dirty durable caches at a fixed interval
//! - Dedup sweep: evicts expired deduplication entries
//! - Quota sweep: deletes closed quota windows

mod flush;
mod sweep;

pub use flush::spawn_flush_task;
pub use sweep::{spawn_dedup_sweep_task, spawn_quota_sweep_task};

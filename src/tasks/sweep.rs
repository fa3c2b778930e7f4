//! Periodic Sweep Tasks
//!
//! Background housekeeping: removing expired deduplication entries and
//! closed quota windows. Neither sweep is required for correctness
//! (both caches handle expiry lazily on access); they exist to bound
//! memory and storage growth.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dedup::DedupCache;
use crate::quota::QuotaTracker;

/// Spawns a background task that evicts expired deduplication entries
/// every `interval_ms`.
pub fn spawn_dedup_sweep_task(dedup: DedupCache, interval_ms: u64) -> JoinHandle<()> {
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting dedup sweep task with interval of {}ms",
            interval_ms
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = dedup.sweep_expired();
            if removed > 0 {
                info!("Dedup sweep: removed {} expired entries", removed);
            } else {
                debug!("Dedup sweep: no expired entries found");
            }
        }
    })
}

/// Spawns a background task that deletes closed quota windows every
/// `interval_ms`.
pub fn spawn_quota_sweep_task(quota: QuotaTracker, interval_ms: u64) -> JoinHandle<()> {
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting quota sweep task with interval of {}ms",
            interval_ms
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = quota.sweep_expired().await;
            if removed > 0 {
                info!("Quota sweep: removed {} expired records", removed);
            } else {
                debug!("Quota sweep: no expired records found");
            }
        }
    })
}

//! Periodic Flush Task
//!
//! Background task that persists a durable cache at a fixed interval
//! while it is dirty. A failed flush leaves the dirty flag set, so the
//! next tick retries; durability is at-least-once. Each tick awaits the
//! previous save before sleeping again, so flushes never overlap.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::DurableCache;

/// Spawns a background task that flushes `cache` every `interval_ms`
/// while dirty.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the
/// task during graceful shutdown. The shutdown path must still force a
/// final flush itself, since an aborted task may die mid-interval.
pub fn spawn_flush_task<T>(
    cache: Arc<RwLock<DurableCache<T>>>,
    interval_ms: u64,
) -> JoinHandle<()>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        {
            let cache = cache.read().await;
            info!(
                "Starting flush task for '{}' cache with interval of {}ms",
                cache.name(),
                interval_ms
            );
        }

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire write lock and flush if anything changed
            let mut cache = cache.write().await;
            match cache.flush_if_dirty().await {
                Ok(true) => debug!("Flushed '{}' cache ({} entries)", cache.name(), cache.len()),
                Ok(false) => {}
                // Dirty flag is still set; the next tick retries
                Err(e) => error!("Flush of '{}' cache failed: {}", cache.name(), e),
            }
        }
    })
}

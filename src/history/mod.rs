//! History Module
//!
//! Bounded per-user retention of summarization results, backed by the
//! durable cache (one list per user id).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::cache::{current_timestamp_ms, DurableCache};
use crate::models::Summary;

/// Process-wide sequence for history record ids.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

// == History Record ==
/// One retained summarization result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Record identity, unique within this deployment
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// The retained result payload
    pub summary: Summary,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
}

// == History Store ==
/// Newest-first, capped per-user result history.
#[derive(Clone)]
pub struct HistoryStore {
    cache: Arc<RwLock<DurableCache<Vec<HistoryRecord>>>>,
    max_per_user: usize,
}

impl HistoryStore {
    // == Constructor ==
    pub fn new(
        cache: Arc<RwLock<DurableCache<Vec<HistoryRecord>>>>,
        max_per_user: usize,
    ) -> Self {
        Self {
            cache,
            max_per_user,
        }
    }

    // == Append ==
    /// Prepends a record for `user_id`, evicting the oldest beyond the cap.
    pub async fn append(&self, user_id: &str, summary: Summary) -> HistoryRecord {
        let created_at = current_timestamp_ms();
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
        let record = HistoryRecord {
            id: format!("{}-{}", created_at, seq),
            user_id: user_id.to_string(),
            summary,
            created_at,
        };

        let mut cache = self.cache.write().await;
        let mut records = cache.get(user_id).unwrap_or_default();
        records.insert(0, record.clone());
        records.truncate(self.max_per_user);
        cache.set(user_id, records);

        record
    }

    // == List ==
    /// Returns the retained records for `user_id`, newest first.
    pub async fn list(&self, user_id: &str) -> Vec<HistoryRecord> {
        self.cache.read().await.get(user_id).unwrap_or_default()
    }

    // == Clear User ==
    /// Drops all retained records for `user_id`.
    pub async fn clear_user(&self, user_id: &str) -> bool {
        self.cache.write().await.delete(user_id)
    }

    // == Accessors ==
    /// Shared handle to the underlying durable table.
    pub fn cache(&self) -> &Arc<RwLock<DurableCache<Vec<HistoryRecord>>>> {
        &self.cache
    }
}

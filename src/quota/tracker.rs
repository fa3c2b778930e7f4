//! Quota Tracker Module
//!
//! Enforces a per-identity counting limit over a rolling window, backed
//! by the durable cache. Window rollover is handled lazily on access;
//! the periodic sweep only bounds table growth.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{current_timestamp_ms, DurableCache};
use crate::quota::QuotaRecord;

// == Decision Types ==
/// Outcome of a consuming quota check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Consumptions left after this decision
    pub remaining: u32,
    /// When the current window closes (Unix milliseconds)
    pub reset_at: u64,
}

/// Read-only view of a user's current usage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaUsage {
    /// Consumptions in the current window
    pub used: u32,
    /// Consumptions left in the current window
    pub remaining: u32,
    /// When the current window closes (Unix milliseconds)
    pub reset_at: u64,
}

// == Quota Tracker ==
/// Rolling-window rate limiter over the durable quota table.
#[derive(Clone)]
pub struct QuotaTracker {
    cache: Arc<RwLock<DurableCache<QuotaRecord>>>,
    limit: u32,
    window_length_ms: u64,
}

impl QuotaTracker {
    // == Constructor ==
    pub fn new(
        cache: Arc<RwLock<DurableCache<QuotaRecord>>>,
        limit: u32,
        window_length_ms: u64,
    ) -> Self {
        Self {
            cache,
            limit,
            window_length_ms,
        }
    }

    // == Check And Consume ==
    /// Consumes one unit of quota for `user_id` if any remains.
    ///
    /// The read-modify-write runs under a single write lock, so two
    /// callers racing on the same user serialize and the counter can
    /// never skip past the limit. An expired or missing record is
    /// replaced with a fresh window before the check.
    pub async fn check_and_consume(&self, user_id: &str) -> QuotaDecision {
        let now = current_timestamp_ms();
        let mut cache = self.cache.write().await;

        let mut record = match cache.get(user_id) {
            Some(record) if !record.is_expired(now) => record,
            _ => QuotaRecord::fresh(user_id, now, self.window_length_ms),
        };

        if record.count >= self.limit {
            debug!("Quota exhausted for user '{}'", user_id);
            return QuotaDecision {
                allowed: false,
                remaining: 0,
                reset_at: record.reset_at,
            };
        }

        record.count += 1;
        let decision = QuotaDecision {
            allowed: true,
            remaining: self.limit - record.count,
            reset_at: record.reset_at,
        };
        cache.set(user_id, record);
        decision
    }

    // == Peek ==
    /// Reports usage for `user_id` without mutating anything.
    ///
    /// A missing or expired record reads as a fresh window: zero used,
    /// full limit remaining, and the `reset_at` a new window would get.
    pub async fn peek(&self, user_id: &str) -> QuotaUsage {
        let now = current_timestamp_ms();
        let cache = self.cache.read().await;

        match cache.get(user_id) {
            Some(record) if !record.is_expired(now) => QuotaUsage {
                used: record.count,
                remaining: self.limit.saturating_sub(record.count),
                reset_at: record.reset_at,
            },
            _ => QuotaUsage {
                used: 0,
                remaining: self.limit,
                reset_at: now + self.window_length_ms,
            },
        }
    }

    // == Reset ==
    /// Administrative reset: deletes the record so the next check starts
    /// a fresh window.
    pub async fn reset(&self, user_id: &str) -> bool {
        self.cache.write().await.delete(user_id)
    }

    // == Sweep Expired ==
    /// Deletes records whose window has closed. Returns the number removed.
    ///
    /// Not required for correctness (rollover is lazy); exists to bound
    /// memory and storage growth.
    pub async fn sweep_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut cache = self.cache.write().await;

        let expired: Vec<String> = cache
            .get_all()
            .into_iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(key, _)| key)
            .collect();

        let count = expired.len();
        for key in expired {
            cache.delete(&key);
        }
        count
    }

    // == Accessors ==
    /// The configured per-window limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Shared handle to the underlying durable table, used by the flush
    /// task and the shutdown path.
    pub fn cache(&self) -> &Arc<RwLock<DurableCache<QuotaRecord>>> {
        &self.cache
    }
}

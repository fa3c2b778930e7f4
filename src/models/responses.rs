//! Response DTOs for the summarization API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::dedup::{DedupSource, DedupStats};
use crate::history::HistoryRecord;
use crate::quota::QuotaUsage;

/// Quota state attached to a successful summarize response.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaStatus {
    /// Consumptions in the current window, including this one
    pub used: u32,
    /// Consumptions left in the current window
    pub remaining: u32,
    /// When the current window closes (Unix milliseconds)
    pub reset_at: u64,
}

/// Response body for the summarize operation (POST /summarize)
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    /// The generated summary text
    pub summary: String,
    /// Content fingerprint used as the deduplication key
    pub fingerprint: String,
    /// How the result was produced (fresh, cached, coalesced)
    pub source: DedupSource,
    /// Character count of the summarized input
    pub input_chars: usize,
    /// Generation timestamp (Unix milliseconds)
    pub generated_at: u64,
    /// Present only for identified callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaStatus>,
}

/// Error body returned with 429 when the quota is exhausted.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaExceededResponse {
    /// Human-readable rejection message
    pub error: String,
    /// Consumptions left (always zero here)
    pub remaining: u32,
    /// When the caller may try again (Unix milliseconds)
    pub reset_at: u64,
}

impl QuotaExceededResponse {
    pub fn new(reset_at: u64) -> Self {
        Self {
            error: "Daily summarization limit reached".to_string(),
            remaining: 0,
            reset_at,
        }
    }
}

/// Response body for the quota query (GET /quota/:user_id)
#[derive(Debug, Clone, Serialize)]
pub struct QuotaResponse {
    /// The queried user
    pub user_id: String,
    /// Consumptions in the current window
    pub used: u32,
    /// Consumptions left in the current window
    pub remaining: u32,
    /// When the current window closes (Unix milliseconds)
    pub reset_at: u64,
}

impl QuotaResponse {
    pub fn new(user_id: impl Into<String>, usage: QuotaUsage) -> Self {
        Self {
            user_id: user_id.into(),
            used: usage.used,
            remaining: usage.remaining,
            reset_at: usage.reset_at,
        }
    }
}

/// Response body for the administrative quota reset (DELETE /quota/:user_id)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    /// Success message
    pub message: String,
    /// The user whose quota was reset
    pub user_id: String,
}

impl ResetResponse {
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            message: format!("Quota for '{}' reset successfully", user_id),
            user_id,
        }
    }
}

/// Response body for the history query (GET /history/:user_id)
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    /// The queried user
    pub user_id: String,
    /// Retained results, newest first
    pub summaries: Vec<HistoryRecord>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Deduplication cache metrics
    pub dedup: DedupStats,
    /// Fraction of admissions that avoided an upstream call
    pub dedup_rate: f64,
    /// Tracked quota records
    pub quota_entries: usize,
    /// Users with retained history
    pub history_users: usize,
}

impl StatsResponse {
    pub fn new(dedup: DedupStats, quota_entries: usize, history_users: usize) -> Self {
        let dedup_rate = dedup.dedup_rate();
        Self {
            dedup,
            dedup_rate,
            quota_entries,
            history_users,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

//! Quota Record Module
//!
//! Per-user usage counter over a rolling window.

use serde::{Deserialize, Serialize};

// == Quota Record ==
/// Usage counter for one rate-limited identity.
///
/// The window is rolling from first use: `reset_at` is set when the
/// record is created and the record is replaced wholesale once
/// `now >= reset_at` is observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaRecord {
    /// Identity of the rate-limited subject
    pub user_id: String,
    /// Summarizations consumed in the current window
    pub count: u32,
    /// Absolute timestamp (Unix milliseconds) when the window closes
    pub reset_at: u64,
}

impl QuotaRecord {
    /// Creates a fresh record with a zero count and a window starting now.
    pub fn fresh(user_id: impl Into<String>, now: u64, window_length_ms: u64) -> Self {
        Self {
            user_id: user_id.into(),
            count: 0,
            reset_at: now + window_length_ms,
        }
    }

    /// True once the window has closed.
    ///
    /// Boundary condition: the window is closed when the current time is
    /// greater than or equal to `reset_at`.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.reset_at
    }
}

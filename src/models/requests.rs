//! Request DTOs for the summarization API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

// == Public Constants ==
/// Maximum accepted content size in bytes
pub const MAX_CONTENT_LENGTH: usize = 1024 * 1024; // 1 MB

/// Request body for the summarize operation (POST /summarize)
///
/// # Fields
/// - `user_id`: Optional caller credential; absent or unresolvable means
///   the anonymous path (no quota applies, nothing is tracked)
/// - `content`: The extracted document text to summarize
/// - `notify`: Whether to relay the result to the messaging platform
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    /// Raw caller credential
    #[serde(default)]
    pub user_id: Option<String>,
    /// The text to summarize
    pub content: String,
    /// Relay the result via the notifier
    #[serde(default)]
    pub notify: bool,
}

impl SummarizeRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.content.trim().is_empty() {
            return Some("Content cannot be empty".to_string());
        }
        if self.content.len() > MAX_CONTENT_LENGTH {
            return Some(format!(
                "Content exceeds maximum size of {} bytes",
                MAX_CONTENT_LENGTH
            ));
        }
        None
    }
}

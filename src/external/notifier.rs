//! Notifier Seam
//!
//! Outbound message delivery. The core exposes quota and history state
//! as plain data for the notifier to format; it has no dependency on
//! delivery succeeding, so callers log failures and move on.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;

// == Notifier Trait ==
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a message to the user on the messaging platform.
    async fn deliver(&self, user_id: &str, message: &str) -> Result<()>;
}

// == Log Notifier ==
/// Delivery stub that records the message in the service log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, user_id: &str, message: &str) -> Result<()> {
        info!(
            "Notification for '{}' ({} chars): {}",
            user_id,
            message.len(),
            message
        );
        Ok(())
    }
}

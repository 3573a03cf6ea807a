//! Notification seam
//!
//! The pipeline reports batch outcomes through [`RejectionNotifier`];
//! actual delivery (email, chat) lives with external collaborators. The
//! bundled [`LogNotifier`] writes the notification into the structured
//! log, which is also what dry runs use.

use crate::domain::{Result, SyncResult};
use async_trait::async_trait;

/// Consumer of batch reconciliation results
#[async_trait]
pub trait RejectionNotifier: Send + Sync {
    /// Called after a finalized run when notification is enabled and the
    /// run imported new rejections.
    async fn notify(&self, result: &SyncResult) -> Result<()>;
}

/// Notifier that logs instead of delivering
pub struct LogNotifier {
    recipient: Option<String>,
}

impl LogNotifier {
    pub fn new(recipient: Option<String>) -> Self {
        Self { recipient }
    }
}

#[async_trait]
impl RejectionNotifier for LogNotifier {
    async fn notify(&self, result: &SyncResult) -> Result<()> {
        tracing::info!(
            batch_id = %result.batch_id,
            recipient = self.recipient.as_deref().unwrap_or("-"),
            new_rejections = result.new_records,
            updated = result.updated_records,
            errors = result.total_errors,
            window_from = %result.window_from,
            window_to = %result.window_to,
            "New rejections notification"
        );
        Ok(())
    }
}

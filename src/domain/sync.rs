//! Sync batch result and reconciliation accounting
//!
//! One [`SyncResult`] is created per orchestrator run, accumulates per-item
//! outcomes without ever aborting the batch, and is immutable once
//! finalized. Every fetched row must land in exactly one bucket so the
//! accounting identity stays checkable.

use super::ids::{ClaimNumber, RecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Overall outcome of one sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every processed item succeeded
    Success,
    /// Some items succeeded and some failed
    Partial,
    /// Nothing succeeded, or authentication/search itself failed
    Failed,
}

/// How a persisted record was classified by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    New,
    Updated,
}

/// One successfully imported record, in portal row order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedRecord {
    pub record_id: RecordId,
    pub claim_number: ClaimNumber,
    pub outcome: ImportOutcome,
}

/// A fetched item that was deliberately not imported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub claim_number: Option<ClaimNumber>,
    pub reason: String,
}

/// A fetched item that failed during extraction, mapping, or persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErroredItem {
    /// Claim number when it was known at the point of failure
    pub claim_number: Option<ClaimNumber>,
    pub error: String,
    /// Optional structured payload for diagnostics (e.g. the raw row)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Outcome of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    /// Unique id of this batch run
    pub batch_id: Uuid,

    /// Start of the searched submission-date window
    pub window_from: NaiveDate,

    /// End of the searched submission-date window
    pub window_to: NaiveDate,

    /// Rows seen in the portal's result tables, parsed or not
    pub total_fetched: usize,

    /// Newly created canonical records
    pub new_records: usize,

    /// Existing records updated with changed content
    pub updated_records: usize,

    /// Items deliberately not imported (filters, unchanged re-imports)
    pub total_skipped: usize,

    /// Items that failed during extraction, mapping, or persistence
    pub total_errors: usize,

    /// Imported record ids preserving portal row order
    pub imported: Vec<ImportedRecord>,

    /// Skip entries with their reasons
    pub skipped: Vec<SkippedItem>,

    /// Error entries with claim numbers where known
    pub errors: Vec<ErroredItem>,

    /// Overall run status, set at finalize time
    pub status: SyncStatus,

    /// Whether a fatal failure (auth, initial search) ended the run early
    pub fatal: bool,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncResult {
    /// Starts an empty result for the given window.
    pub fn begin(window_from: NaiveDate, window_to: NaiveDate, started_at: DateTime<Utc>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            window_from,
            window_to,
            total_fetched: 0,
            new_records: 0,
            updated_records: 0,
            total_skipped: 0,
            total_errors: 0,
            imported: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            status: SyncStatus::Failed,
            fatal: false,
            started_at,
            finished_at: None,
        }
    }

    /// Records an imported record, preserving insertion order.
    pub fn add_imported(&mut self, record: ImportedRecord) {
        match record.outcome {
            ImportOutcome::New => self.new_records += 1,
            ImportOutcome::Updated => self.updated_records += 1,
        }
        self.imported.push(record);
    }

    /// Records a deliberate skip.
    pub fn add_skipped(&mut self, claim_number: Option<ClaimNumber>, reason: impl Into<String>) {
        self.total_skipped += 1;
        self.skipped.push(SkippedItem {
            claim_number,
            reason: reason.into(),
        });
    }

    /// Records a per-item failure.
    pub fn add_error(
        &mut self,
        claim_number: Option<ClaimNumber>,
        error: impl Into<String>,
        detail: Option<serde_json::Value>,
    ) {
        self.total_errors += 1;
        self.errors.push(ErroredItem {
            claim_number,
            error: error.into(),
            detail,
        });
    }

    /// Marks the run as fatally failed (authentication or initial search).
    pub fn mark_fatal(&mut self, error: impl Into<String>) {
        self.fatal = true;
        self.add_error(None, error, None);
    }

    /// Total successfully imported records (new + updated).
    pub fn total_imported(&self) -> usize {
        self.new_records + self.updated_records
    }

    /// Verifies the accounting identity:
    /// `total_fetched == imported + skipped + errors`.
    ///
    /// A false return is itself an integrity defect and must be reported,
    /// not silently accepted.
    pub fn accounting_balanced(&self) -> bool {
        self.total_fetched == self.total_imported() + self.total_skipped + self.total_errors
    }

    /// Finalizes the run, deriving the overall status.
    ///
    /// The result must not be mutated after this call.
    pub fn finalize(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
        self.status = if self.fatal || (self.total_imported() == 0 && self.total_errors > 0) {
            SyncStatus::Failed
        } else if self.total_errors == 0 {
            SyncStatus::Success
        } else {
            SyncStatus::Partial
        };

        if !self.accounting_balanced() {
            tracing::error!(
                batch_id = %self.batch_id,
                total_fetched = self.total_fetched,
                imported = self.total_imported(),
                skipped = self.total_skipped,
                errors = self.total_errors,
                "Reconciliation accounting mismatch - integrity defect"
            );
        }
    }

    /// Run duration, when finished.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .map(|end| (end - self.started_at).to_std().unwrap_or(Duration::ZERO))
    }

    /// Logs the reconciliation summary.
    pub fn log_summary(&self) {
        tracing::info!(
            batch_id = %self.batch_id,
            window_from = %self.window_from,
            window_to = %self.window_to,
            total_fetched = self.total_fetched,
            new_records = self.new_records,
            updated_records = self.updated_records,
            skipped = self.total_skipped,
            errors = self.total_errors,
            status = ?self.status,
            balanced = self.accounting_balanced(),
            "Sync run completed"
        );

        for item in &self.errors {
            tracing::warn!(
                claim_number = item.claim_number.as_ref().map(|c| c.as_str()),
                error = %item.error,
                "Sync item error"
            );
        }
    }
}

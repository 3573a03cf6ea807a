//! Persistence trait for canonical rejection records
//!
//! The orchestrator persists each mapped record individually and only
//! needs back a new-vs-updated classification; it assumes nothing about
//! the storage technology behind the trait.

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::{CanonicalRejectionRecord, RecordId, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// How an upsert was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// First time this record id was seen
    Created(RecordId),
    /// Known id, changed content
    Updated(RecordId),
    /// Known id, identical content fingerprint
    Unchanged(RecordId),
}

impl PersistOutcome {
    /// The record id regardless of classification.
    pub fn record_id(&self) -> &RecordId {
        match self {
            PersistOutcome::Created(id)
            | PersistOutcome::Updated(id)
            | PersistOutcome::Unchanged(id) => id,
        }
    }
}

/// Store for canonical rejection records
#[async_trait]
pub trait RejectionStore: Send + Sync {
    /// Persists one record, classifying it against what is already stored.
    ///
    /// Classification is fingerprint-based: same id + same content
    /// fingerprint is `Unchanged`, same id + different fingerprint is
    /// `Updated`.
    async fn upsert(&self, record: &CanonicalRejectionRecord) -> Result<PersistOutcome>;

    /// Number of distinct records stored.
    async fn count(&self) -> Result<usize>;
}

/// Builds the configured store backend.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn RejectionStore>> {
    match config.backend {
        StoreBackend::Jsonl => {
            let store = super::jsonl::JsonlStore::open(&config.path).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(super::memory::MemoryStore::new())),
    }
}

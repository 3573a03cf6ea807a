//! In-memory record store
//!
//! Backs tests and `--dry-run` batches: the full pipeline runs, nothing
//! survives the process.

use super::traits::{PersistOutcome, RejectionStore};
use crate::domain::{CanonicalRejectionRecord, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Volatile store keyed by record id
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, CanonicalRejectionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored, for assertions.
    pub async fn records(&self) -> Vec<CanonicalRejectionRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl RejectionStore for MemoryStore {
    async fn upsert(&self, record: &CanonicalRejectionRecord) -> Result<PersistOutcome> {
        let id = record.id.clone();
        let key = id.as_str().to_string();
        let fingerprint = record.fingerprint();

        let mut records = self.records.write().await;
        let outcome = match records.get(&key) {
            None => PersistOutcome::Created(id),
            Some(existing) if existing.fingerprint() == fingerprint => {
                PersistOutcome::Unchanged(id)
            }
            Some(_) => PersistOutcome::Updated(id),
        };
        records.insert(key, record.clone());
        Ok(outcome)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

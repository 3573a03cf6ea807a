//! Append-only JSONL record store
//!
//! One canonical record per line. The newest line for a record id wins;
//! an in-memory fingerprint index built at open time classifies upserts
//! without re-reading the file.

use super::traits::{PersistOutcome, RejectionStore};
use crate::domain::errors::StoreError;
use crate::domain::{CanonicalRejectionRecord, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// File-backed store
pub struct JsonlStore {
    path: PathBuf,
    /// record id -> content fingerprint of the newest stored line
    index: Mutex<HashMap<String, String>>,
}

impl JsonlStore {
    /// Opens (or creates) the store at `path`, building the id index.
    ///
    /// Unreadable lines are logged and skipped rather than poisoning the
    /// whole store; an interrupted earlier run must not block future runs.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::OpenFailed(format!("{}: {e}", parent.display())))?;
            }
        }

        let mut index = HashMap::new();
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for (line_no, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<CanonicalRejectionRecord>(line) {
                        Ok(record) => {
                            index.insert(record.id.as_str().to_string(), record.fingerprint());
                        }
                        Err(e) => {
                            tracing::warn!(
                                path = %path.display(),
                                line = line_no + 1,
                                error = %e,
                                "Skipping unreadable store line"
                            );
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StoreError::OpenFailed(format!("{}: {e}", path.display())).into())
            }
        }

        tracing::debug!(
            path = %path.display(),
            records = index.len(),
            "JSONL store opened"
        );

        Ok(Self {
            path,
            index: Mutex::new(index),
        })
    }
}

#[async_trait]
impl RejectionStore for JsonlStore {
    async fn upsert(&self, record: &CanonicalRejectionRecord) -> Result<PersistOutcome> {
        let id = record.id.clone();
        let key = id.as_str().to_string();
        let fingerprint = record.fingerprint();

        let mut index = self.index.lock().await;

        let outcome = match index.get(&key) {
            None => PersistOutcome::Created(id),
            Some(existing) if *existing == fingerprint => {
                // Identical content: nothing appended, nothing changed
                return Ok(PersistOutcome::Unchanged(id));
            }
            Some(_) => PersistOutcome::Updated(id),
        };

        let line = serde_json::to_string(record)
            .map_err(|e| StoreError::WriteFailed(format!("serialize: {e}")))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        file.write_all(b"\n")
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        index.insert(key, fingerprint);
        Ok(outcome)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.index.lock().await.len())
    }
}

//! Persistence adapters
//!
//! Canonical rejection records are handed to a [`RejectionStore`] one at
//! a time; the store answers with a new/updated/unchanged classification
//! driven by content fingerprints.

pub mod jsonl;
pub mod memory;
pub mod traits;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use traits::{create_store, PersistOutcome, RejectionStore};

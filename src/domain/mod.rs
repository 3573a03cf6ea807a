//! Domain models and types for the OASIS pipeline.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ClaimNumber`], [`RejectionId`], [`RecordId`])
//! - **Portal-native models** ([`PortalClaim`], [`PortalRejection`]) - transient per extraction pass
//! - **The canonical record** ([`CanonicalRejectionRecord`]) - the durable, bilingual shape
//! - **Search criteria** ([`SearchCriteria`]) - validated before any navigation
//! - **Batch accounting** ([`SyncResult`]) - one per run, immutable once finalized
//! - **Error types** ([`OasisError`], [`NavigationError`], [`DataError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so claim numbers, rejection ids, and
//! record ids cannot be mixed up at call sites:
//!
//! ```rust
//! use oasis_sync::domain::{ClaimNumber, RejectionId};
//!
//! # fn example() -> Result<(), String> {
//! let claim = ClaimNumber::new("CLM-2025-001")?;
//! let rejection = RejectionId::derived_from(&claim);
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod claim;
pub mod criteria;
pub mod errors;
pub mod ids;
pub mod rejection;
pub mod result;
pub mod sync;

// Re-export commonly used types for convenience
pub use canonical::{
    AnalysisBlock, AppealRecord, BilingualText, CanonicalRejectionRecord, CanonicalStatus,
    FinancialBlock, PatientBlock, PayerBlock, ProviderBlock, ReceptionMode, RecordMetadata,
    RejectionDetails, RiskLevel, ServiceItem, TimelineBlock,
};
pub use claim::{
    ClaimStatus, ClaimType, MoneyBreakdown, PortalClaim, PortalClaimBuilder, PortalClaimItem,
};
pub use criteria::{SearchCriteria, SearchCriteriaBuilder};
pub use errors::{DataError, NavigationError, OasisError, StoreError};
pub use ids::{ClaimNumber, RecordId, RejectionId};
pub use rejection::{ItemRejection, PortalRejection, RejectionCategory, RejectionType};
pub use result::Result;
pub use sync::{
    ErroredItem, ImportOutcome, ImportedRecord, SkippedItem, SyncResult, SyncStatus,
};

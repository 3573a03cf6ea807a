//! Canonical mapping
//!
//! Pure translation from portal-native claim/rejection shapes into the
//! platform's canonical record, with deadline, compliance, and risk
//! derivation. Deterministic under an injected clock.

pub mod clock;
pub mod derive;
pub mod mapper;

pub use clock::{Clock, FixedClock, SystemClock};
pub use derive::{base_risk, derive_preventable, derive_risk, root_cause, HistoricalContext};
pub use mapper::{CanonicalMapper, APPEAL_WINDOW_DAYS};

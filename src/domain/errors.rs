//! Domain error types
//!
//! This module defines the error hierarchy for the OASIS pipeline.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main pipeline error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum OasisError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Authentication against the portal failed (fatal, never retried)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Navigation-related errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Extraction/parsing errors
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Network/connection errors (transient; bounded by per-action timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Browser session errors (launch, teardown, lost tab)
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The run was cancelled by an external shutdown signal
    #[error("Run cancelled")]
    Cancelled,

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Navigation-specific errors
///
/// Recoverable at the batch level; fatal for the specific sub-goal.
/// When no strategy reaches a goal, the visible links are captured so
/// the failure can be diagnosed without replaying the session.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No strategy in the ordered list reached the goal
    #[error("No path to goal '{goal}' ({} links visible)", .visible_links.len())]
    NoPathToGoal {
        goal: String,
        visible_links: Vec<String>,
    },

    /// A planned step was found but executing it failed
    #[error("Action failed: {action}: {reason}")]
    ActionFailed { action: String, reason: String },

    /// A navigation or settle wait exceeded its timeout
    #[error("Timed out after {seconds}s: {action}")]
    Timeout { action: String, seconds: u64 },
}

/// Extraction-specific errors
///
/// Per-row and per-claim failures are converted into skip/error
/// entries by the orchestrator and never abort a batch.
#[derive(Debug, Error)]
pub enum DataError {
    /// Search criteria failed validation (rejected before any navigation)
    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),

    /// No form matching the expected shape was found on the page
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// None of the candidate matchers located a logical field
    #[error("Field '{field}' not found (tried: {})", .candidates.join(", "))]
    FieldNotFound {
        field: String,
        candidates: Vec<String>,
    },

    /// No results-like table was found after a search
    #[error("Results table not found")]
    ResultsTableNotFound,

    /// A single result row could not be parsed
    #[error("Row {row} failed to parse: {reason}")]
    RowParse { row: usize, reason: String },

    /// The detail view for a claim could not be read
    #[error("Detail unavailable for claim {claim}: {reason}")]
    DetailUnavailable { claim: String, reason: String },

    /// A labeled value expected on the page was missing
    #[error("Missing value for label '{label}'")]
    MissingValue { label: String },

    /// A cell value could not be interpreted (date, amount, ...)
    #[error("Invalid value '{value}' for {what}")]
    InvalidValue { what: String, value: String },
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the backing store
    #[error("Failed to open store: {0}")]
    OpenFailed(String),

    /// Failed to write a record
    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    /// Failed to read back stored data
    #[error("Failed to read store: {0}")]
    ReadFailed(String),

    /// The store contents could not be interpreted
    #[error("Store corrupt: {0}")]
    Corrupt(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for OasisError {
    fn from(err: std::io::Error) -> Self {
        OasisError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for OasisError {
    fn from(err: serde_json::Error) -> Self {
        OasisError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for OasisError {
    fn from(err: toml::de::Error) -> Self {
        OasisError::Configuration(format!("TOML parse error: {err}"))
    }
}

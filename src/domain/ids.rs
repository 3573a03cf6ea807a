//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that cross component boundaries.
//! Each type ensures the two most common extraction defects (empty strings
//! and swapped arguments) become compile-time or construction-time errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Claim number newtype wrapper
///
/// The portal's unique key for a claim. Format varies by payer
/// (e.g. `CLM-2025-001`, `10-442-771`); only non-emptiness is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimNumber(String);

impl ClaimNumber {
    /// Creates a new ClaimNumber from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Claim number cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the claim number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClaimNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ClaimNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rejection identifier newtype wrapper
///
/// The portal-side identifier of a denial. When the portal exposes none,
/// a synthetic `REJ-{claim_number}` id is derived so downstream keying
/// stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RejectionId(String);

impl RejectionId {
    /// Creates a new RejectionId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Rejection id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derives a synthetic rejection id from the owning claim number.
    pub fn derived_from(claim: &ClaimNumber) -> Self {
        Self(format!("REJ-{}", claim.as_str()))
    }

    /// Returns the rejection id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RejectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RejectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Canonical record identifier
///
/// Deterministically derived from the claim number and rejection id so that
/// re-running the mapper on the same inputs produces the same id, which is
/// what lets the store classify an upsert as new vs updated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Derives the record id for a claim/rejection pair.
    pub fn derive(claim: &ClaimNumber, rejection: Option<&RejectionId>) -> Self {
        match rejection {
            Some(rej) => Self(format!("{}::{}", claim.as_str(), rej.as_str())),
            None => Self(format!("{}::-", claim.as_str())),
        }
    }

    /// Returns the record id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

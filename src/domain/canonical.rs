//! Canonical rejection record
//!
//! The platform's durable, bilingual, deadline-aware representation of a
//! denial. Created by the mapper, owned thereafter by the persistence
//! collaborator; all downstream business logic reads this shape.

use super::claim::MoneyBreakdown;
use super::ids::{ClaimNumber, RecordId, RejectionId};
use super::rejection::{RejectionCategory, RejectionType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Bilingual text block (Arabic + English)
///
/// Compliance letters and dashboards are rendered in both locales, so any
/// text that reaches the canonical record carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub ar: String,
    pub en: String,
}

impl BilingualText {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            en: en.into(),
        }
    }

    /// Wraps untranslated portal text in both locales.
    ///
    /// The portal emits mixed-language free text; when no translation
    /// exists the same string serves both sides rather than leaving one
    /// locale empty.
    pub fn untranslated(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            ar: text.clone(),
            en: text,
        }
    }
}

/// Lifecycle status of a canonical rejection record
///
/// Transitions only move forward: pending-review → under-appeal →
/// {recovered | final-rejection}. Backward transitions are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    PendingReview,
    UnderAppeal,
    Recovered,
    FinalRejection,
}

impl CanonicalStatus {
    /// Whether moving to `next` is a legal forward transition.
    pub fn can_transition_to(&self, next: CanonicalStatus) -> bool {
        use CanonicalStatus::*;
        matches!(
            (self, next),
            (PendingReview, UnderAppeal)
                | (UnderAppeal, Recovered)
                | (UnderAppeal, FinalRejection)
        )
    }
}

/// How severe a denial is for revenue-cycle follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// One step up, saturating at High.
    pub fn escalate(self) -> RiskLevel {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        }
    }
}

/// Channel through which a rejection statement was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionMode {
    /// Electronic health-exchange network
    Nphies,
    /// Scraped from the payer's web portal
    Portal,
    /// Statement arrived by email
    Email,
}

/// Patient identity block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientBlock {
    pub name: BilingualText,
    pub national_id: Option<String>,
    pub membership_number: Option<String>,
}

/// Provider identity block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderBlock {
    pub name: Option<String>,
    pub provider_number: Option<String>,
    pub branch: Option<String>,
}

/// Payer identity block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerBlock {
    pub name: BilingualText,
    pub payer_code: Option<String>,
    pub tpa_name: Option<String>,
}

/// Rejection detail block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionDetails {
    pub rejection_id: RejectionId,
    pub code: String,
    pub reason: BilingualText,
    pub rejection_type: RejectionType,
    pub category: RejectionCategory,
}

/// Three-amount financial block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialBlock {
    pub billed: MoneyBreakdown,
    pub rejected: MoneyBreakdown,
    pub approved: MoneyBreakdown,
}

/// Timeline block with the derived compliance fields
///
/// `appeal_deadline` is always exactly 30 calendar days after
/// `claim_submission_date`; the regulatory window within which a payer's
/// rejection must be received to avoid the automatic full-payment
/// assumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBlock {
    pub claim_submission_date: NaiveDate,
    pub encounter_date: Option<NaiveDate>,
    pub rejection_received_date: NaiveDate,
    pub days_to_rejection: i64,
    pub appeal_deadline: NaiveDate,
    pub days_until_deadline: i64,
    pub within_30_days: bool,
}

/// Appeal sub-record, present once an appeal is filed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealRecord {
    pub appeal_id: String,
    pub filed_date: NaiveDate,
    pub status: CanonicalStatus,
    pub amount_recovered: Option<MoneyBreakdown>,
}

/// One canonical service line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub item_code: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub amount: MoneyBreakdown,
    pub rejected: bool,
    pub rejection_reason: Option<String>,
}

/// Root-cause analysis block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBlock {
    pub root_cause: BilingualText,
    pub preventable: bool,
    pub risk_level: RiskLevel,
    pub corrective_action_required: bool,
}

/// Import provenance metadata
///
/// `imported_by` and `imported_at` are the only fields tied to the wall
/// clock of the import itself; they are excluded from the fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source_system: String,
    pub reception_mode: ReceptionMode,
    pub imported_by: String,
    pub imported_at: DateTime<Utc>,
}

/// The platform's durable representation of a denial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRejectionRecord {
    pub id: RecordId,
    pub claim_number: ClaimNumber,
    pub patient: PatientBlock,
    pub provider: ProviderBlock,
    pub payer: PayerBlock,
    pub rejection: RejectionDetails,
    pub financial: FinancialBlock,
    pub timeline: TimelineBlock,
    pub status: CanonicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appeal: Option<AppealRecord>,
    pub service_items: Vec<ServiceItem>,
    pub analysis: AnalysisBlock,
    pub metadata: RecordMetadata,
}

impl CanonicalRejectionRecord {
    /// Content fingerprint over everything except import-time metadata.
    ///
    /// Two extractions of the same portal state hash identically even when
    /// imported at different times, which is what lets a store tell an
    /// updated record from an unchanged re-import.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let mut stable = self.clone();
        stable.metadata.imported_by = String::new();
        stable.metadata.imported_at = DateTime::<Utc>::UNIX_EPOCH;
        // Struct field order is fixed, so the JSON form is deterministic.
        let json = serde_json::to_string(&stable).unwrap_or_default();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Applies a forward status transition.
    ///
    /// # Errors
    ///
    /// Returns the rejected transition as a string error when it would
    /// move backward or skip a stage.
    pub fn transition_status(&mut self, next: CanonicalStatus) -> Result<(), String> {
        if self.status.can_transition_to(next) {
            self.status = next;
            Ok(())
        } else {
            Err(format!(
                "illegal status transition {:?} -> {:?}",
                self.status, next
            ))
        }
    }
}

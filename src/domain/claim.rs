//! Portal-native claim model
//!
//! These types mirror what the OASIS portal itself presents. They exist only
//! transiently in memory during an extraction pass; the durable shape is
//! [`crate::domain::canonical::CanonicalRejectionRecord`].

use super::ids::ClaimNumber;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Claim status as presented by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    Approved,
    Rejected,
    Pending,
    UnderReview,
}

impl ClaimStatus {
    /// All statuses, in the order the portal's filter dropdown lists them.
    pub fn all() -> [ClaimStatus; 5] {
        [
            ClaimStatus::Submitted,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
            ClaimStatus::Pending,
            ClaimStatus::UnderReview,
        ]
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Pending => "pending",
            ClaimStatus::UnderReview => "under_review",
        };
        write!(f, "{s}")
    }
}

/// Claim type as presented by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Inpatient,
    Outpatient,
    Pharmacy,
    Dental,
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClaimType::Inpatient => "inpatient",
            ClaimType::Outpatient => "outpatient",
            ClaimType::Pharmacy => "pharmacy",
            ClaimType::Dental => "dental",
        };
        write!(f, "{s}")
    }
}

/// Three-part monetary amount: net, VAT, and total
///
/// Every amount that crosses the pipeline carries this breakdown; the
/// downstream platform validates the same three keys on its side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MoneyBreakdown {
    pub net: f64,
    pub vat: f64,
    pub total: f64,
}

impl MoneyBreakdown {
    /// Creates a breakdown from explicit parts.
    pub fn new(net: f64, vat: f64, total: f64) -> Self {
        Self { net, vat, total }
    }

    /// Builds a breakdown from a total using the standard 15% VAT split.
    ///
    /// Used when the portal shows only a single amount column.
    pub fn from_total(total: f64) -> Self {
        let net = round2(total / 1.15);
        Self {
            net,
            vat: round2(total - net),
            total: round2(total),
        }
    }

    /// Zero amount.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Component-wise subtraction, clamped at zero.
    pub fn saturating_sub(&self, other: &MoneyBreakdown) -> MoneyBreakdown {
        MoneyBreakdown {
            net: round2((self.net - other.net).max(0.0)),
            vat: round2((self.vat - other.vat).max(0.0)),
            total: round2((self.total - other.total).max(0.0)),
        }
    }
}

/// Rounds to 2 decimal places (halalas).
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One claim as represented by the external portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalClaim {
    /// Unique key within the portal
    pub claim_number: ClaimNumber,

    /// Insurance membership number
    pub membership_number: Option<String>,

    /// Provider number issued by the payer
    pub provider_number: Option<String>,

    /// Patient display name as shown by the portal
    pub patient_name: Option<String>,

    /// Patient national/iqama id
    pub patient_national_id: Option<String>,

    /// Claim type, when the result table exposes it
    pub claim_type: Option<ClaimType>,

    /// Date the claim was submitted to the payer
    pub submission_date: NaiveDate,

    /// Date of service/encounter, when exposed
    pub service_date: Option<NaiveDate>,

    /// Billed amount breakdown
    pub amount: MoneyBreakdown,

    /// Claim status as mapped from the portal's status text
    pub status: ClaimStatus,

    /// Line items, in portal order (populated from the detail view)
    #[serde(default)]
    pub items: Vec<PortalClaimItem>,
}

impl PortalClaim {
    /// Creates a new builder for constructing a PortalClaim
    pub fn builder() -> PortalClaimBuilder {
        PortalClaimBuilder::default()
    }
}

/// One service line item within a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalClaimItem {
    /// Service/procedure code
    pub item_code: String,

    /// Human-readable description
    pub description: Option<String>,

    /// Billed quantity
    pub quantity: f64,

    /// Line amount breakdown
    pub amount: MoneyBreakdown,

    /// Item-level status, when the portal breaks it out
    pub status: Option<ClaimStatus>,
}

/// Builder for constructing PortalClaim instances
#[derive(Debug, Default)]
pub struct PortalClaimBuilder {
    claim_number: Option<ClaimNumber>,
    membership_number: Option<String>,
    provider_number: Option<String>,
    patient_name: Option<String>,
    patient_national_id: Option<String>,
    claim_type: Option<ClaimType>,
    submission_date: Option<NaiveDate>,
    service_date: Option<NaiveDate>,
    amount: Option<MoneyBreakdown>,
    status: Option<ClaimStatus>,
    items: Vec<PortalClaimItem>,
}

impl PortalClaimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_number(mut self, claim_number: ClaimNumber) -> Self {
        self.claim_number = Some(claim_number);
        self
    }

    pub fn membership_number(mut self, v: impl Into<String>) -> Self {
        self.membership_number = Some(v.into());
        self
    }

    pub fn provider_number(mut self, v: impl Into<String>) -> Self {
        self.provider_number = Some(v.into());
        self
    }

    pub fn patient_name(mut self, v: impl Into<String>) -> Self {
        self.patient_name = Some(v.into());
        self
    }

    pub fn patient_national_id(mut self, v: impl Into<String>) -> Self {
        self.patient_national_id = Some(v.into());
        self
    }

    pub fn claim_type(mut self, v: ClaimType) -> Self {
        self.claim_type = Some(v);
        self
    }

    pub fn submission_date(mut self, v: NaiveDate) -> Self {
        self.submission_date = Some(v);
        self
    }

    pub fn service_date(mut self, v: NaiveDate) -> Self {
        self.service_date = Some(v);
        self
    }

    pub fn amount(mut self, v: MoneyBreakdown) -> Self {
        self.amount = Some(v);
        self
    }

    pub fn status(mut self, v: ClaimStatus) -> Self {
        self.status = Some(v);
        self
    }

    pub fn item(mut self, item: PortalClaimItem) -> Self {
        self.items.push(item);
        self
    }

    /// Builds the PortalClaim
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<PortalClaim, String> {
        Ok(PortalClaim {
            claim_number: self.claim_number.ok_or("claim_number is required")?,
            membership_number: self.membership_number,
            provider_number: self.provider_number,
            patient_name: self.patient_name,
            patient_national_id: self.patient_national_id,
            claim_type: self.claim_type,
            submission_date: self.submission_date.ok_or("submission_date is required")?,
            service_date: self.service_date,
            amount: self.amount.ok_or("amount is required")?,
            status: self.status.ok_or("status is required")?,
            items: self.items,
        })
    }
}

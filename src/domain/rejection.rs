//! Portal-native rejection model
//!
//! A claim-level or item-level denial as read off the portal's detail
//! pages, before translation into the canonical record.

use super::claim::MoneyBreakdown;
use super::ids::RejectionId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scope of a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionType {
    /// The whole claim was denied
    Full,
    /// Part of the claimed amount was denied
    Partial,
    /// Specific line items were denied
    Item,
}

/// Business category of a rejection, inferred from the code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    Medical,
    Technical,
    Administrative,
    Billing,
    Authorization,
}

impl RejectionCategory {
    /// Infers the category from a rejection code.
    ///
    /// The prefix table is fixed and longest-prefix-first, so `AUTH9` is
    /// authorization while `A77` stays administrative. Unknown prefixes
    /// fall back to technical. Matching is case-insensitive and must be
    /// reproducible for the same code.
    pub fn from_code(code: &str) -> Self {
        let upper = code.trim().to_uppercase();
        if upper.starts_with("AUTH") {
            RejectionCategory::Authorization
        } else if upper.starts_with('M') {
            RejectionCategory::Medical
        } else if upper.starts_with('T') {
            RejectionCategory::Technical
        } else if upper.starts_with('A') {
            RejectionCategory::Administrative
        } else if upper.starts_with('B') {
            RejectionCategory::Billing
        } else {
            RejectionCategory::Technical
        }
    }
}

impl std::fmt::Display for RejectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectionCategory::Medical => "medical",
            RejectionCategory::Technical => "technical",
            RejectionCategory::Administrative => "administrative",
            RejectionCategory::Billing => "billing",
            RejectionCategory::Authorization => "authorization",
        };
        write!(f, "{s}")
    }
}

/// A claim-level or item-level denial as represented by the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalRejection {
    /// Portal-side identifier (synthesized from the claim number when absent)
    pub rejection_id: RejectionId,

    /// Date the rejection was issued
    pub rejection_date: NaiveDate,

    /// Scope of the denial
    pub rejection_type: RejectionType,

    /// Payer rejection code (e.g. `MED-001`, `AUTH-9`)
    pub code: String,

    /// Free-text reason as shown by the portal
    pub reason: String,

    /// Category inferred from the code prefix
    pub category: RejectionCategory,

    /// Rejected amount breakdown
    pub rejected_amount: MoneyBreakdown,

    /// Payer display name
    pub payer_name: Option<String>,

    /// Payer code, when exposed
    pub payer_code: Option<String>,

    /// Whether the portal marks the rejection as appealable
    pub appeal_eligible: bool,

    /// Appeal deadline shown by the portal, if any
    pub appeal_deadline: Option<NaiveDate>,

    /// Item-level denial details, in portal order
    #[serde(default)]
    pub item_rejections: Vec<ItemRejection>,
}

impl PortalRejection {
    /// Derives the scope from amounts when the portal doesn't label it.
    ///
    /// Item-level details take precedence; otherwise a rejected total that
    /// covers the billed total is a full denial.
    pub fn derive_type(
        billed: &MoneyBreakdown,
        rejected: &MoneyBreakdown,
        has_item_details: bool,
    ) -> RejectionType {
        if has_item_details {
            RejectionType::Item
        } else if rejected.total + f64::EPSILON >= billed.total {
            RejectionType::Full
        } else {
            RejectionType::Partial
        }
    }
}

/// Denial detail for one line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRejection {
    /// Service/procedure code of the denied item
    pub item_code: String,

    /// Item-level rejection code, when distinct from the claim-level code
    pub code: Option<String>,

    /// Item-level reason text
    pub reason: Option<String>,

    /// Rejected amount for this item
    pub rejected_amount: MoneyBreakdown,
}

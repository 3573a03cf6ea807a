//! Navigation goals and their vocabularies
//!
//! A goal names a place in the portal worth reaching; its vocabulary is
//! the ordered list of visible-text terms (English and Arabic) that may
//! lead there. Vocabulary is data, so tuning navigation for a portal
//! revision means editing a list, not control flow.

use crate::domain::ClaimNumber;

/// A place in the portal the strategist can be asked to reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationGoal {
    /// The claim search form
    ClaimSearch,
    /// The rejection/denial listing
    RejectionList,
    /// A specific claim's detail view, reached via its claim-number link
    ClaimDetail(ClaimNumber),
    /// End the portal session
    Logout,
}

impl NavigationGoal {
    /// Human-readable goal name, used in traces and errors.
    pub fn label(&self) -> String {
        match self {
            NavigationGoal::ClaimSearch => "claim search".to_string(),
            NavigationGoal::RejectionList => "rejection list".to_string(),
            NavigationGoal::ClaimDetail(claim) => format!("claim detail {claim}"),
            NavigationGoal::Logout => "logout".to_string(),
        }
    }

    /// Visible-text terms that may lead to this goal, in match order.
    pub fn vocabulary(&self) -> Vec<String> {
        match self {
            NavigationGoal::ClaimSearch => vec![
                "claim search".to_string(),
                "search claims".to_string(),
                "claims inquiry".to_string(),
                "claims".to_string(),
                "بحث المطالبات".to_string(),
                "استعلام المطالبات".to_string(),
                "المطالبات".to_string(),
            ],
            NavigationGoal::RejectionList => vec![
                "rejections".to_string(),
                "rejected claims".to_string(),
                "denials".to_string(),
                "المطالبات المرفوضة".to_string(),
                "الرفض".to_string(),
            ],
            // The claim number itself is the only reliable hook into detail
            NavigationGoal::ClaimDetail(claim) => vec![claim.as_str().to_string()],
            NavigationGoal::Logout => vec![
                "logout".to_string(),
                "sign out".to_string(),
                "تسجيل الخروج".to_string(),
                "خروج".to_string(),
            ],
        }
    }
}

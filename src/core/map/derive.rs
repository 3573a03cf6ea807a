//! Business-rule derivation for the analysis block
//!
//! Risk, preventability, and root cause are functions of the rejection
//! category plus historical frequency context supplied by the caller.
//! The mapper never queries external state itself; whoever runs the batch
//! decides what history to feed in.

use crate::domain::{BilingualText, RejectionCategory, RiskLevel};

/// Historical frequency context for one rejection code
#[derive(Debug, Clone, Copy)]
pub struct HistoricalContext {
    /// How many times this code was seen before in this provider's history
    pub prior_occurrences: u32,

    /// Occurrences at or above this count as "frequent"
    pub frequency_threshold: u32,
}

impl HistoricalContext {
    pub fn new(prior_occurrences: u32) -> Self {
        Self {
            prior_occurrences,
            ..Default::default()
        }
    }

    /// Whether this code recurs often enough to escalate.
    pub fn is_frequent(&self) -> bool {
        self.prior_occurrences >= self.frequency_threshold
    }
}

impl Default for HistoricalContext {
    fn default() -> Self {
        Self {
            prior_occurrences: 0,
            frequency_threshold: 3,
        }
    }
}

/// Base risk per category, before frequency escalation.
pub fn base_risk(category: RejectionCategory) -> RiskLevel {
    match category {
        RejectionCategory::Medical | RejectionCategory::Authorization => RiskLevel::High,
        RejectionCategory::Billing | RejectionCategory::Administrative => RiskLevel::Medium,
        RejectionCategory::Technical => RiskLevel::Low,
    }
}

/// Risk level: category base, escalated one step for frequent codes.
pub fn derive_risk(category: RejectionCategory, context: &HistoricalContext) -> RiskLevel {
    let base = base_risk(category);
    if context.is_frequent() {
        base.escalate()
    } else {
        base
    }
}

/// Preventability: process-side categories are always preventable;
/// clinical categories only count as preventable once they recur.
pub fn derive_preventable(category: RejectionCategory, context: &HistoricalContext) -> bool {
    match category {
        RejectionCategory::Technical
        | RejectionCategory::Billing
        | RejectionCategory::Administrative => true,
        RejectionCategory::Medical | RejectionCategory::Authorization => context.is_frequent(),
    }
}

/// Fixed bilingual root-cause text per category.
pub fn root_cause(category: RejectionCategory) -> BilingualText {
    match category {
        RejectionCategory::Medical => BilingualText::new(
            "عدم إثبات الضرورة الطبية",
            "Medical necessity not established",
        ),
        RejectionCategory::Technical => {
            BilingualText::new("خطأ تقني في الإرسال", "Technical submission error")
        }
        RejectionCategory::Administrative => BilingualText::new(
            "عدم استيفاء المتطلبات الإدارية",
            "Administrative requirements not met",
        ),
        RejectionCategory::Billing => BilingualText::new(
            "اختلاف في الفوترة أو الترميز",
            "Billing or coding discrepancy",
        ),
        RejectionCategory::Authorization => BilingualText::new(
            "موافقة مسبقة مفقودة أو غير صالحة",
            "Missing or invalid prior authorization",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RejectionCategory::Medical, RiskLevel::High)]
    #[test_case(RejectionCategory::Authorization, RiskLevel::High)]
    #[test_case(RejectionCategory::Billing, RiskLevel::Medium)]
    #[test_case(RejectionCategory::Administrative, RiskLevel::Medium)]
    #[test_case(RejectionCategory::Technical, RiskLevel::Low)]
    fn test_base_risk(category: RejectionCategory, expected: RiskLevel) {
        assert_eq!(base_risk(category), expected);
    }

    #[test]
    fn test_frequent_codes_escalate_risk() {
        let infrequent = HistoricalContext::new(1);
        let frequent = HistoricalContext::new(5);

        assert_eq!(
            derive_risk(RejectionCategory::Technical, &infrequent),
            RiskLevel::Low
        );
        assert_eq!(
            derive_risk(RejectionCategory::Technical, &frequent),
            RiskLevel::Medium
        );
        // Already-high categories saturate
        assert_eq!(
            derive_risk(RejectionCategory::Medical, &frequent),
            RiskLevel::High
        );
    }

    #[test]
    fn test_preventability_by_category() {
        let fresh = HistoricalContext::new(0);
        let recurring = HistoricalContext::new(4);

        assert!(derive_preventable(RejectionCategory::Technical, &fresh));
        assert!(derive_preventable(RejectionCategory::Billing, &fresh));
        assert!(!derive_preventable(RejectionCategory::Medical, &fresh));
        assert!(derive_preventable(RejectionCategory::Medical, &recurring));
    }

    #[test]
    fn test_root_cause_is_bilingual() {
        for category in [
            RejectionCategory::Medical,
            RejectionCategory::Technical,
            RejectionCategory::Administrative,
            RejectionCategory::Billing,
            RejectionCategory::Authorization,
        ] {
            let cause = root_cause(category);
            assert!(!cause.ar.is_empty());
            assert!(!cause.en.is_empty());
            assert_ne!(cause.ar, cause.en);
        }
    }
}

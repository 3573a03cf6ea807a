//! Portal-to-canonical mapping
//!
//! Transforms a portal claim (plus its rejection, when one exists) into
//! the platform's canonical bilingual record. Pure given its inputs and
//! the injected clock: the same claim, rejection, context, and clock
//! produce a byte-identical record.

use super::clock::Clock;
use super::derive::{self, HistoricalContext};
use crate::domain::{
    AnalysisBlock, BilingualText, CanonicalRejectionRecord, CanonicalStatus, ClaimStatus,
    FinancialBlock, MoneyBreakdown, PatientBlock, PayerBlock, PortalClaim, PortalRejection,
    ProviderBlock, ReceptionMode, RecordId, RecordMetadata, RejectionCategory, RejectionDetails,
    RejectionId, RiskLevel, ServiceItem, TimelineBlock,
};
use chrono::Duration;

/// Days from claim submission within which a payer's rejection must be
/// received; also the appeal window the deadline fields are derived from.
pub const APPEAL_WINDOW_DAYS: i64 = 30;

/// Maps portal shapes into canonical rejection records
#[derive(Debug, Clone)]
pub struct CanonicalMapper {
    imported_by: String,
}

impl CanonicalMapper {
    pub fn new(imported_by: impl Into<String>) -> Self {
        Self {
            imported_by: imported_by.into(),
        }
    }

    /// Maps one claim and its optional rejection into a canonical record.
    ///
    /// Derived fields:
    /// - `days_to_rejection` = received date − submission date
    /// - `appeal_deadline` = submission date + 30 days, always exactly
    /// - `days_until_deadline` = appeal deadline − today (injected clock)
    /// - `within_30_days` = days_to_rejection ≤ 30
    ///
    /// Risk and preventability come from the category plus the caller's
    /// historical context; this function performs no external queries.
    pub fn map(
        &self,
        claim: &PortalClaim,
        rejection: Option<&PortalRejection>,
        context: &HistoricalContext,
        clock: &dyn Clock,
    ) -> CanonicalRejectionRecord {
        let now = clock.now();
        let today = now.date_naive();

        let rejection_id = rejection
            .map(|r| r.rejection_id.clone())
            .unwrap_or_else(|| RejectionId::derived_from(&claim.claim_number));

        let received_date = rejection.map(|r| r.rejection_date).unwrap_or(today);

        let days_to_rejection = (received_date - claim.submission_date).num_days();
        let appeal_deadline = claim.submission_date + Duration::days(APPEAL_WINDOW_DAYS);
        let days_until_deadline = (appeal_deadline - today).num_days();
        let within_30_days = days_to_rejection <= APPEAL_WINDOW_DAYS;

        let billed = claim.amount;
        let rejected = rejection
            .map(|r| r.rejected_amount)
            .unwrap_or_else(MoneyBreakdown::zero);
        let approved = billed.saturating_sub(&rejected);

        let category = rejection
            .map(|r| r.category)
            .unwrap_or(RejectionCategory::Technical);

        let analysis = match rejection {
            Some(_) => {
                let risk_level = derive::derive_risk(category, context);
                let preventable = derive::derive_preventable(category, context);
                AnalysisBlock {
                    root_cause: derive::root_cause(category),
                    preventable,
                    risk_level,
                    corrective_action_required: preventable || risk_level == RiskLevel::High,
                }
            }
            // Nothing denied yet: nothing to prevent, nothing to correct
            None => AnalysisBlock {
                root_cause: BilingualText::new("لا يوجد رفض", "No rejection recorded"),
                preventable: false,
                risk_level: RiskLevel::Low,
                corrective_action_required: false,
            },
        };

        CanonicalRejectionRecord {
            id: RecordId::derive(&claim.claim_number, Some(&rejection_id)),
            claim_number: claim.claim_number.clone(),
            patient: PatientBlock {
                name: claim
                    .patient_name
                    .as_deref()
                    .map(BilingualText::untranslated)
                    .unwrap_or_else(|| BilingualText::new("غير محدد", "Unspecified")),
                national_id: claim.patient_national_id.clone(),
                membership_number: claim.membership_number.clone(),
            },
            provider: ProviderBlock {
                name: None,
                provider_number: claim.provider_number.clone(),
                branch: None,
            },
            payer: PayerBlock {
                name: rejection
                    .and_then(|r| r.payer_name.as_deref())
                    .map(BilingualText::untranslated)
                    .unwrap_or_else(|| BilingualText::new("غير محدد", "Unspecified")),
                payer_code: rejection.and_then(|r| r.payer_code.clone()),
                tpa_name: None,
            },
            rejection: RejectionDetails {
                rejection_id,
                code: rejection.map(|r| r.code.clone()).unwrap_or_default(),
                reason: rejection
                    .map(|r| BilingualText::untranslated(&r.reason))
                    .unwrap_or_else(|| BilingualText::new("", "")),
                rejection_type: rejection
                    .map(|r| r.rejection_type)
                    .unwrap_or_else(|| PortalRejection::derive_type(&billed, &rejected, false)),
                category,
            },
            financial: FinancialBlock {
                billed,
                rejected,
                approved,
            },
            timeline: TimelineBlock {
                claim_submission_date: claim.submission_date,
                encounter_date: claim.service_date,
                rejection_received_date: received_date,
                days_to_rejection,
                appeal_deadline,
                days_until_deadline,
                within_30_days,
            },
            status: CanonicalStatus::PendingReview,
            appeal: None,
            service_items: map_service_items(claim, rejection),
            analysis,
            metadata: RecordMetadata {
                source_system: "OASIS".to_string(),
                reception_mode: ReceptionMode::Portal,
                imported_by: self.imported_by.clone(),
                imported_at: now,
            },
        }
    }
}

/// Builds the ordered service-item list.
///
/// Claim line items are the source of truth; item-level rejections mark
/// them. When the claim carries no items (search results rarely do), the
/// rejection's own item details stand in.
fn map_service_items(
    claim: &PortalClaim,
    rejection: Option<&PortalRejection>,
) -> Vec<ServiceItem> {
    let item_rejections = rejection.map(|r| r.item_rejections.as_slice()).unwrap_or(&[]);

    if !claim.items.is_empty() {
        return claim
            .items
            .iter()
            .map(|item| {
                let denial = item_rejections
                    .iter()
                    .find(|ir| ir.item_code == item.item_code);
                ServiceItem {
                    item_code: item.item_code.clone(),
                    description: item.description.clone(),
                    quantity: item.quantity,
                    amount: item.amount,
                    rejected: denial.is_some() || item.status == Some(ClaimStatus::Rejected),
                    rejection_reason: denial.and_then(|ir| ir.reason.clone()),
                }
            })
            .collect();
    }

    item_rejections
        .iter()
        .map(|ir| ServiceItem {
            item_code: ir.item_code.clone(),
            description: None,
            quantity: 1.0,
            amount: ir.rejected_amount,
            rejected: true,
            rejection_reason: ir.reason.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::clock::FixedClock;
    use crate::domain::{ClaimNumber, ItemRejection, PortalClaimItem, RejectionType};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn clock(s: &str) -> FixedClock {
        FixedClock(
            Utc.from_utc_datetime(
                &date(s).and_hms_opt(8, 0, 0).unwrap(),
            ),
        )
    }

    fn sample_claim() -> PortalClaim {
        PortalClaim::builder()
            .claim_number(ClaimNumber::new("CLM-2025-001").unwrap())
            .membership_number("MBR-44")
            .patient_name("Ahmed Ali")
            .submission_date(date("2025-01-20"))
            .amount(MoneyBreakdown::new(1000.0, 150.0, 1150.0))
            .status(ClaimStatus::Rejected)
            .build()
            .unwrap()
    }

    fn sample_rejection() -> PortalRejection {
        PortalRejection {
            rejection_id: RejectionId::new("REJ-CLM-2025-001").unwrap(),
            rejection_date: date("2025-01-25"),
            rejection_type: RejectionType::Full,
            code: "MED-001".to_string(),
            reason: "Not medically necessary".to_string(),
            category: RejectionCategory::from_code("MED-001"),
            rejected_amount: MoneyBreakdown::new(1000.0, 150.0, 1150.0),
            payer_name: Some("Best Insurance".to_string()),
            payer_code: Some("INS-3".to_string()),
            appeal_eligible: true,
            appeal_deadline: None,
            item_rejections: vec![],
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        // CLM-2025-001 submitted 2025-01-20, rejected 2025-01-25, MED-001
        let mapper = CanonicalMapper::new("sync");
        let record = mapper.map(
            &sample_claim(),
            Some(&sample_rejection()),
            &HistoricalContext::default(),
            &clock("2025-02-01"),
        );

        assert_eq!(record.rejection.category, RejectionCategory::Medical);
        assert_eq!(record.timeline.days_to_rejection, 5);
        assert!(record.timeline.within_30_days);
        assert_eq!(record.timeline.appeal_deadline, date("2025-02-19"));
        assert_eq!(record.timeline.days_until_deadline, 18);
        assert_eq!(record.status, CanonicalStatus::PendingReview);
        assert_eq!(record.financial.approved.total, 0.0);
    }

    #[test]
    fn test_appeal_deadline_is_exactly_30_days() {
        let mapper = CanonicalMapper::new("sync");
        for day in ["2025-01-01", "2025-02-28", "2025-12-31"] {
            let mut claim = sample_claim();
            claim.submission_date = date(day);
            let record = mapper.map(
                &claim,
                Some(&sample_rejection()),
                &HistoricalContext::default(),
                &clock("2025-06-01"),
            );
            assert_eq!(
                record.timeline.appeal_deadline,
                claim.submission_date + Duration::days(30)
            );
        }
    }

    #[test]
    fn test_late_rejection_not_within_30_days() {
        let mapper = CanonicalMapper::new("sync");
        let mut rejection = sample_rejection();
        rejection.rejection_date = date("2025-03-01");

        let record = mapper.map(
            &sample_claim(),
            Some(&rejection),
            &HistoricalContext::default(),
            &clock("2025-03-02"),
        );

        assert_eq!(record.timeline.days_to_rejection, 40);
        assert!(!record.timeline.within_30_days);
        assert!(record.timeline.days_until_deadline < 0);
    }

    #[test]
    fn test_idempotence_under_fixed_clock() {
        let mapper = CanonicalMapper::new("sync");
        let claim = sample_claim();
        let rejection = sample_rejection();
        let context = HistoricalContext::new(2);
        let fixed = clock("2025-02-01");

        let a = mapper.map(&claim, Some(&rejection), &context, &fixed);
        let b = mapper.map(&claim, Some(&rejection), &context, &fixed);

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_record_id_stable_across_import_times() {
        let mapper = CanonicalMapper::new("sync");
        let a = mapper.map(
            &sample_claim(),
            Some(&sample_rejection()),
            &HistoricalContext::default(),
            &clock("2025-02-01"),
        );
        let b = mapper.map(
            &sample_claim(),
            Some(&sample_rejection()),
            &HistoricalContext::default(),
            &clock("2025-03-15"),
        );

        // Import time differs, identity and content fingerprint do not
        assert_eq!(a.id, b.id);
        assert_ne!(a.metadata.imported_at, b.metadata.imported_at);
        assert_ne!(a.timeline.days_until_deadline, b.timeline.days_until_deadline);
    }

    #[test]
    fn test_partial_rejection_financials() {
        let mapper = CanonicalMapper::new("sync");
        let mut rejection = sample_rejection();
        rejection.rejected_amount = MoneyBreakdown::new(400.0, 60.0, 460.0);
        rejection.rejection_type = RejectionType::Partial;

        let record = mapper.map(
            &sample_claim(),
            Some(&rejection),
            &HistoricalContext::default(),
            &clock("2025-02-01"),
        );

        assert_eq!(record.financial.approved.net, 600.0);
        assert_eq!(record.financial.approved.total, 690.0);
    }

    #[test]
    fn test_mapping_without_rejection() {
        let mapper = CanonicalMapper::new("sync");
        let mut claim = sample_claim();
        claim.status = ClaimStatus::Pending;

        let record = mapper.map(
            &claim,
            None,
            &HistoricalContext::default(),
            &clock("2025-02-01"),
        );

        assert_eq!(record.financial.rejected.total, 0.0);
        assert_eq!(record.financial.approved.total, 1150.0);
        assert!(!record.analysis.corrective_action_required);
        assert_eq!(record.analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_frequent_category_escalates_analysis() {
        let mapper = CanonicalMapper::new("sync");
        let record = mapper.map(
            &sample_claim(),
            Some(&sample_rejection()),
            &HistoricalContext::new(5),
            &clock("2025-02-01"),
        );

        assert_eq!(record.analysis.risk_level, RiskLevel::High);
        assert!(record.analysis.preventable);
        assert!(record.analysis.corrective_action_required);
    }

    #[test]
    fn test_service_items_marked_by_item_rejections() {
        let mapper = CanonicalMapper::new("sync");
        let mut claim = sample_claim();
        claim.items = vec![
            PortalClaimItem {
                item_code: "83036".to_string(),
                description: Some("HbA1c".to_string()),
                quantity: 1.0,
                amount: MoneyBreakdown::from_total(115.0),
                status: None,
            },
            PortalClaimItem {
                item_code: "80061".to_string(),
                description: None,
                quantity: 1.0,
                amount: MoneyBreakdown::from_total(230.0),
                status: None,
            },
        ];
        let mut rejection = sample_rejection();
        rejection.item_rejections = vec![ItemRejection {
            item_code: "83036".to_string(),
            code: None,
            reason: Some("Not covered".to_string()),
            rejected_amount: MoneyBreakdown::from_total(115.0),
        }];

        let record = mapper.map(
            &claim,
            Some(&rejection),
            &HistoricalContext::default(),
            &clock("2025-02-01"),
        );

        assert_eq!(record.service_items.len(), 2);
        assert!(record.service_items[0].rejected);
        assert_eq!(
            record.service_items[0].rejection_reason.as_deref(),
            Some("Not covered")
        );
        assert!(!record.service_items[1].rejected);
    }
}

//! Search execution and rejection-detail extraction
//!
//! Drives the portal's claim search end to end: fill the form through
//! ranked field matchers, submit, wait for the page to settle, parse the
//! results table row by row, and drill into detail pages for
//! rejection-specific fields using label proximity.

use super::fields::{self, FieldMatch};
use super::rows::{self, ResultColumns};
use crate::adapters::browser::PortalDriver;
use crate::core::analyze::{self, PageStructure, TableStructure};
use crate::core::navigate::{self, NavigationGoal};
use crate::domain::errors::DataError;
use crate::domain::{
    ClaimStatus, ItemRejection, MoneyBreakdown, PortalClaim, PortalRejection, RejectionCategory,
    RejectionId, SearchCriteria,
};
use crate::domain::{OasisError, Result};

/// One result page of parsed claims
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Claims parsed from the results table, in portal row order
    pub claims: Vec<PortalClaim>,

    /// Rows that failed to parse, with their reasons
    pub row_failures: Vec<RowFailure>,

    /// Total result count as reported (or estimated, see flag)
    pub total: usize,

    /// True when `total` came from counting parsed rows because the page
    /// exposed no count indicator. On paginated result sets this
    /// understates the real total; callers must page on row counts, not
    /// on this value.
    pub total_is_estimate: bool,
}

impl SearchResult {
    /// Rows seen on this page, parsed or not.
    pub fn rows_seen(&self) -> usize {
        self.claims.len() + self.row_failures.len()
    }
}

/// One unparseable result row
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// Zero-based row index within the results table
    pub row: usize,
    pub reason: String,
}

/// Count-indicator label vocabulary
const COUNT_LABELS: &[&str] = &["total", "count", "results", "records", "إجمالي", "عدد", "نتائج"];

/// Detail-page label vocabulary for rejection fields
const REJECTION_CODE_LABELS: &[&str] = &["rejection code", "denial code", "رمز الرفض", "code"];
const REJECTION_REASON_LABELS: &[&str] =
    &["rejection reason", "denial reason", "سبب الرفض", "reason", "السبب"];
const REJECTION_DATE_LABELS: &[&str] = &["rejection date", "denial date", "تاريخ الرفض"];
const REJECTED_AMOUNT_LABELS: &[&str] =
    &["rejected amount", "denied amount", "المبلغ المرفوض"];
const PAYER_LABELS: &[&str] = &["insurance", "payer", "شركة التأمين", "التأمين"];
const PAYER_CODE_LABELS: &[&str] = &["payer code", "insurance code", "رمز الشركة"];
const APPEAL_DEADLINE_LABELS: &[&str] =
    &["appeal deadline", "appeal due", "آخر موعد للاعتراض", "مهلة الاعتراض"];
const APPEAL_ELIGIBLE_LABELS: &[&str] = &["appealable", "appeal eligible", "قابل للاعتراض"];

/// Item-table vocabulary
const ITEM_CODE_HEADERS: &[&str] = &["item", "service", "code", "رمز الخدمة", "الخدمة"];
const ITEM_REASON_HEADERS: &[&str] = &["reason", "سبب"];
const ITEM_AMOUNT_HEADERS: &[&str] = &["amount", "total", "مبلغ"];
const ITEM_STATUS_HEADERS: &[&str] = &["status", "حالة"];

fn fill_when_present(
    structure: &PageStructure,
    matcher: &fields::FieldMatcher,
    value: Option<&str>,
) -> Option<(FieldMatch, String)> {
    let value = value?;
    let hit = fields::find_field(structure, matcher)?;
    Some((hit, value.to_string()))
}

/// Issues a claim search from the portal's search page.
///
/// The driver must already be on the claim-search page (the orchestrator
/// reaches it through the navigation strategist). Criteria are validated
/// first; an invalid date range never touches the browser.
///
/// # Errors
///
/// Returns [`DataError::InvalidCriteria`] before navigation on bad
/// criteria, [`DataError::FieldNotFound`] when the mandatory date fields
/// cannot be located, [`DataError::FormNotFound`] when no submit control
/// exists, and [`DataError::ResultsTableNotFound`] when the page settles
/// without anything table-like.
pub async fn search(driver: &dyn PortalDriver, criteria: &SearchCriteria) -> Result<SearchResult> {
    criteria.validate()?;

    let structure = analyze::analyze(driver).await?;

    // Mandatory date window
    let from = fields::find_field(&structure, &fields::FROM_DATE).ok_or_else(|| {
        DataError::FieldNotFound {
            field: "from_date".to_string(),
            candidates: fields::FROM_DATE
                .candidates
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    })?;
    let to = fields::find_field(&structure, &fields::TO_DATE).ok_or_else(|| {
        DataError::FieldNotFound {
            field: "to_date".to_string(),
            candidates: fields::TO_DATE
                .candidates
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    })?;

    driver
        .fill_field(&from.selector, &criteria.from_date.format("%Y-%m-%d").to_string())
        .await?;
    driver
        .fill_field(&to.selector, &criteria.to_date.format("%Y-%m-%d").to_string())
        .await?;

    // Optional filters, filled only when both the criterion and a field exist
    let optional_fills = [
        fill_when_present(
            &structure,
            &fields::CLAIM_NUMBER,
            criteria.claim_number.as_deref(),
        ),
        fill_when_present(
            &structure,
            &fields::MEMBERSHIP_NUMBER,
            criteria.membership_number.as_deref(),
        ),
        fill_when_present(
            &structure,
            &fields::PATIENT_NATIONAL_ID,
            criteria.patient_national_id.as_deref(),
        ),
        fill_when_present(&structure, &fields::PAYER, criteria.payer_code.as_deref()),
    ];

    for (hit, value) in optional_fills.into_iter().flatten() {
        if hit.field_type == "select" {
            driver.select_option(&hit.selector, &value).await?;
        } else {
            driver.fill_field(&hit.selector, &value).await?;
        }
    }

    // A single-status filter maps onto the status dropdown when one exists
    if let [status] = criteria.statuses.as_slice() {
        if let Some(hit) = fields::find_field(&structure, &fields::STATUS) {
            if hit.field_type == "select" {
                let label = status.to_string().replace('_', " ");
                if let Err(e) = driver.select_option(&hit.selector, &label).await {
                    tracing::debug!(error = %e, "Status filter not applied, filtering after parse");
                }
            }
        }
    }

    let submit = fields::find_submit_button(&structure)
        .ok_or_else(|| DataError::FormNotFound("no submit control on search page".to_string()))?;
    driver.click_button(&submit).await?;
    driver.wait_for_settle().await?;

    let results_page = analyze::analyze(driver).await?;
    parse_results(&results_page)
}

/// Parses the settled results page into a [`SearchResult`].
pub fn parse_results(structure: &PageStructure) -> Result<SearchResult> {
    let table = rows::pick_results_table(&structure.tables)
        .ok_or(OasisError::Data(DataError::ResultsTableNotFound))?;

    let columns = ResultColumns::detect(table).ok_or_else(|| {
        OasisError::Data(DataError::RowParse {
            row: 0,
            reason: "no claim-number column in results table".to_string(),
        })
    })?;

    let mut claims = Vec::new();
    let mut row_failures = Vec::new();

    for (index, row) in table.rows.iter().enumerate() {
        match rows::parse_row(&columns, row, index) {
            Ok(claim) => claims.push(claim),
            Err(e) => {
                tracing::warn!(row = index, error = %e, "Result row skipped");
                row_failures.push(RowFailure {
                    row: index,
                    reason: e.to_string(),
                });
            }
        }
    }

    // Prefer the page's count indicator; otherwise count what we parsed,
    // flagged as an estimate because pagination hides the rest.
    let indicated_total = structure
        .labeled_value(COUNT_LABELS)
        .and_then(|lv| rows::parse_amount(&lv.value))
        .map(|v| v as usize);

    let (total, total_is_estimate) = match indicated_total {
        Some(total) => (total, false),
        None => (claims.len() + row_failures.len(), true),
    };

    if total_is_estimate {
        tracing::debug!(
            counted = total,
            "No count indicator on results page, using parsed row count"
        );
    }

    Ok(SearchResult {
        claims,
        row_failures,
        total,
        total_is_estimate,
    })
}

/// Extracts rejection details for one claim.
///
/// Navigates into the claim's detail view by clicking its claim-number
/// link, reads the rejection block through label proximity, and navigates
/// back. Returns `Ok(None)` when the detail page carries no rejection
/// block at all (pending or approved claims).
///
/// # Errors
///
/// Navigation failures propagate; the orchestrator records them against
/// this claim and continues the batch.
pub async fn rejection_details(
    driver: &dyn PortalDriver,
    claim: &PortalClaim,
) -> Result<Option<PortalRejection>> {
    navigate::reach(driver, &NavigationGoal::ClaimDetail(claim.claim_number.clone())).await?;

    let structure = analyze::analyze(driver).await?;

    let code = structure
        .labeled_value(REJECTION_CODE_LABELS)
        .map(|lv| lv.value.trim().to_string())
        .filter(|v| !v.is_empty());
    let reason = structure
        .labeled_value(REJECTION_REASON_LABELS)
        .map(|lv| lv.value.trim().to_string())
        .filter(|v| !v.is_empty());

    // No code and no reason means this claim has no rejection block
    if code.is_none() && reason.is_none() {
        driver.go_back().await?;
        return Ok(None);
    }

    let code = code.unwrap_or_default();
    let reason = reason.unwrap_or_default();

    let rejection_date = structure
        .labeled_value(REJECTION_DATE_LABELS)
        .and_then(|lv| rows::parse_date(&lv.value))
        .unwrap_or_else(|| {
            // Tolerated: an unreadable date falls back to the submission
            // date rather than losing the whole rejection
            tracing::warn!(
                claim_number = %claim.claim_number,
                "Rejection date missing on detail page, using submission date"
            );
            claim.submission_date
        });

    let rejected_amount = structure
        .labeled_value(REJECTED_AMOUNT_LABELS)
        .and_then(|lv| rows::parse_amount(&lv.value))
        .map(MoneyBreakdown::from_total)
        .unwrap_or(claim.amount);

    let item_rejections = parse_item_rejections(&structure.tables);

    let appeal_deadline = structure
        .labeled_value(APPEAL_DEADLINE_LABELS)
        .and_then(|lv| rows::parse_date(&lv.value));

    let appeal_eligible = structure
        .labeled_value(APPEAL_ELIGIBLE_LABELS)
        .map(|lv| {
            let v = lv.value.to_lowercase();
            v.contains("yes") || v.contains("نعم") || v.contains("true")
        })
        // Rejections are appealable within the window unless stated otherwise
        .unwrap_or(true);

    let rejection = PortalRejection {
        rejection_id: RejectionId::derived_from(&claim.claim_number),
        rejection_date,
        rejection_type: PortalRejection::derive_type(
            &claim.amount,
            &rejected_amount,
            !item_rejections.is_empty(),
        ),
        category: RejectionCategory::from_code(&code),
        code,
        reason,
        rejected_amount,
        payer_name: structure
            .labeled_value(PAYER_LABELS)
            .map(|lv| lv.value.clone()),
        payer_code: structure
            .labeled_value(PAYER_CODE_LABELS)
            .map(|lv| lv.value.clone()),
        appeal_eligible,
        appeal_deadline,
        item_rejections,
    };

    driver.go_back().await?;
    Ok(Some(rejection))
}

/// Parses item-level rejections from a detail page's tables.
fn parse_item_rejections(tables: &[TableStructure]) -> Vec<ItemRejection> {
    let Some(table) = tables
        .iter()
        .find(|t| t.has_header(ITEM_CODE_HEADERS) && t.has_header(ITEM_STATUS_HEADERS))
    else {
        return Vec::new();
    };

    let code_idx = table.header_index(ITEM_CODE_HEADERS);
    let reason_idx = table.header_index(ITEM_REASON_HEADERS);
    let amount_idx = table.header_index(ITEM_AMOUNT_HEADERS);
    let status_idx = table.header_index(ITEM_STATUS_HEADERS);

    table
        .rows
        .iter()
        .filter(|row| {
            status_idx
                .and_then(|i| row.get(i))
                .map(|s| rows::map_status_text(s) == ClaimStatus::Rejected)
                .unwrap_or(false)
        })
        .filter_map(|row| {
            let item_code = code_idx.and_then(|i| row.get(i))?.trim().to_string();
            if item_code.is_empty() {
                return None;
            }
            Some(ItemRejection {
                item_code,
                code: None,
                reason: reason_idx
                    .and_then(|i| row.get(i))
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                rejected_amount: amount_idx
                    .and_then(|i| row.get(i))
                    .and_then(|s| rows::parse_amount(s))
                    .map(MoneyBreakdown::from_total)
                    .unwrap_or_else(MoneyBreakdown::zero),
            })
        })
        .collect()
}

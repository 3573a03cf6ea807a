//! Result-table row parsing
//!
//! Turns the search results table into [`PortalClaim`]s, one `Result` per
//! row. A row that fails to parse is reported, never allowed to abort the
//! page. Cell interpretation is tolerant: several date formats, localized
//! digits left alone, currency markers stripped.

use crate::core::analyze::TableStructure;
use crate::domain::errors::DataError;
use crate::domain::{ClaimNumber, ClaimStatus, ClaimType, MoneyBreakdown, PortalClaim};
use chrono::NaiveDate;

/// Header vocabulary for detecting the claim-number column
const CLAIM_HEADERS: &[&str] = &["claim", "رقم المطالبة", "المطالبة"];
const MEMBER_HEADERS: &[&str] = &["member", "عضوية"];
const PATIENT_HEADERS: &[&str] = &["patient", "مريض", "اسم المريض"];
const NATIONAL_ID_HEADERS: &[&str] = &["national", "iqama", "هوية"];
const TYPE_HEADERS: &[&str] = &["type", "نوع"];
const DATE_HEADERS: &[&str] = &["submission", "date", "تاريخ"];
const NET_HEADERS: &[&str] = &["net", "الصافي"];
const VAT_HEADERS: &[&str] = &["vat", "tax", "الضريبة"];
const TOTAL_HEADERS: &[&str] = &["total", "amount", "الإجمالي", "المبلغ"];
const STATUS_HEADERS: &[&str] = &["status", "حالة"];

/// Maps a portal status string onto the canonical enum.
///
/// Case-insensitive substring matching with a fixed priority order:
/// reject > approve > pending/wait > review > (default) submitted.
/// A string containing both "reject" and "pending" therefore maps to
/// rejected.
pub fn map_status_text(text: &str) -> ClaimStatus {
    let lower = text.to_lowercase();

    if lower.contains("reject") || lower.contains("مرفوض") || lower.contains("رفض") {
        ClaimStatus::Rejected
    } else if lower.contains("approve") || lower.contains("موافق") || lower.contains("مقبول") {
        ClaimStatus::Approved
    } else if lower.contains("pending")
        || lower.contains("wait")
        || lower.contains("معلق")
        || lower.contains("انتظار")
    {
        ClaimStatus::Pending
    } else if lower.contains("review") || lower.contains("مراجعة") {
        ClaimStatus::UnderReview
    } else {
        ClaimStatus::Submitted
    }
}

/// Maps a portal claim-type string, when one is present.
pub fn map_claim_type_text(text: &str) -> Option<ClaimType> {
    let lower = text.to_lowercase();
    if lower.contains("inpatient") || lower.contains("تنويم") {
        Some(ClaimType::Inpatient)
    } else if lower.contains("outpatient") || lower.contains("عيادات") {
        Some(ClaimType::Outpatient)
    } else if lower.contains("pharmacy") || lower.contains("صيدلية") {
        Some(ClaimType::Pharmacy)
    } else if lower.contains("dental") || lower.contains("أسنان") {
        Some(ClaimType::Dental)
    } else {
        None
    }
}

/// Date formats the portal has been seen using, in preference order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Parses a portal date cell.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parses a portal amount cell, stripping currency markers and separators.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace("SAR", "")
        .replace("ر.س", "")
        .replace(['٬', ','], "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Column indices resolved from a results table's header row
#[derive(Debug, Clone)]
pub struct ResultColumns {
    pub claim_number: usize,
    pub membership: Option<usize>,
    pub patient: Option<usize>,
    pub national_id: Option<usize>,
    pub claim_type: Option<usize>,
    pub date: Option<usize>,
    pub net: Option<usize>,
    pub vat: Option<usize>,
    pub total: Option<usize>,
    pub status: Option<usize>,
}

impl ResultColumns {
    /// Resolves columns from a table's headers.
    ///
    /// The claim-number column is the one requirement; everything else is
    /// best-effort.
    pub fn detect(table: &TableStructure) -> Option<Self> {
        let claim_number = table.header_index(CLAIM_HEADERS)?;
        Some(Self {
            claim_number,
            membership: table.header_index(MEMBER_HEADERS),
            patient: table.header_index(PATIENT_HEADERS),
            national_id: table.header_index(NATIONAL_ID_HEADERS),
            claim_type: table.header_index(TYPE_HEADERS),
            date: table.header_index(DATE_HEADERS),
            net: table.header_index(NET_HEADERS),
            vat: table.header_index(VAT_HEADERS),
            total: table.header_index(TOTAL_HEADERS),
            status: table.header_index(STATUS_HEADERS),
        })
    }
}

/// Picks the results table from a page's tables.
///
/// First table whose headers speak the claim vocabulary wins; with no
/// such table, the largest table that has rows is taken as a last resort.
pub fn pick_results_table(tables: &[TableStructure]) -> Option<&TableStructure> {
    tables
        .iter()
        .find(|t| t.has_header(CLAIM_HEADERS) && !t.rows.is_empty())
        .or_else(|| {
            tables
                .iter()
                .filter(|t| !t.rows.is_empty())
                .max_by_key(|t| t.rows.len())
        })
}

fn cell<'a>(row: &'a [String], index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Parses one result row into a claim.
///
/// # Errors
///
/// Returns [`DataError::RowParse`] naming the row index when the claim
/// number or submission date cannot be read.
pub fn parse_row(
    columns: &ResultColumns,
    row: &[String],
    index: usize,
) -> Result<PortalClaim, DataError> {
    let claim_cell = row.get(columns.claim_number).map(String::as_str).unwrap_or("");
    let claim_number = ClaimNumber::new(claim_cell).map_err(|e| DataError::RowParse {
        row: index,
        reason: format!("claim number: {e}"),
    })?;

    let submission_date = cell(row, columns.date)
        .and_then(parse_date)
        .ok_or_else(|| DataError::RowParse {
            row: index,
            reason: "submission date missing or unparseable".to_string(),
        })?;

    let amount = match (
        cell(row, columns.net).and_then(parse_amount),
        cell(row, columns.vat).and_then(parse_amount),
        cell(row, columns.total).and_then(parse_amount),
    ) {
        (Some(net), Some(vat), total) => {
            MoneyBreakdown::new(net, vat, total.unwrap_or(net + vat))
        }
        (_, _, Some(total)) => MoneyBreakdown::from_total(total),
        _ => MoneyBreakdown::zero(),
    };

    let status = cell(row, columns.status)
        .map(map_status_text)
        .unwrap_or(ClaimStatus::Submitted);

    let mut builder = PortalClaim::builder()
        .claim_number(claim_number)
        .submission_date(submission_date)
        .amount(amount)
        .status(status);

    if let Some(v) = cell(row, columns.membership) {
        builder = builder.membership_number(v);
    }
    if let Some(v) = cell(row, columns.patient) {
        builder = builder.patient_name(v);
    }
    if let Some(v) = cell(row, columns.national_id) {
        builder = builder.patient_national_id(v);
    }
    if let Some(t) = cell(row, columns.claim_type).and_then(map_claim_type_text) {
        builder = builder.claim_type(t);
    }

    builder.build().map_err(|e| DataError::RowParse {
        row: index,
        reason: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Rejected", ClaimStatus::Rejected)]
    #[test_case("REJECTED - pending appeal", ClaimStatus::Rejected; "reject beats pending")]
    #[test_case("Approved", ClaimStatus::Approved)]
    #[test_case("approved after review", ClaimStatus::Approved; "approve beats review")]
    #[test_case("Pending", ClaimStatus::Pending)]
    #[test_case("Waiting for payer", ClaimStatus::Pending)]
    #[test_case("Under Review", ClaimStatus::UnderReview)]
    #[test_case("مرفوض", ClaimStatus::Rejected)]
    #[test_case("قيد الانتظار", ClaimStatus::Pending)]
    #[test_case("", ClaimStatus::Submitted; "empty defaults to submitted")]
    #[test_case("Something else", ClaimStatus::Submitted)]
    fn test_status_mapping(text: &str, expected: ClaimStatus) {
        assert_eq!(map_status_text(text), expected);
    }

    #[test_case("2025-01-20", Some((2025, 1, 20)); "iso dashes")]
    #[test_case("20/01/2025", Some((2025, 1, 20)); "dmy slashes")]
    #[test_case("20-01-2025", Some((2025, 1, 20)); "dmy dashes")]
    #[test_case("2025/01/20", Some((2025, 1, 20)); "iso slashes")]
    #[test_case("garbage", None)]
    #[test_case("", None)]
    fn test_date_parsing(text: &str, expected: Option<(i32, u32, u32)>) {
        let parsed = parse_date(text);
        match expected {
            Some((y, m, d)) => {
                assert_eq!(parsed, NaiveDate::from_ymd_opt(y, m, d));
            }
            None => assert!(parsed.is_none()),
        }
    }

    #[test_case("1,150.00", Some(1150.0))]
    #[test_case("SAR 1,150.00", Some(1150.0))]
    #[test_case("1150 ر.س", Some(1150.0))]
    #[test_case("", None)]
    #[test_case("n/a", None)]
    fn test_amount_parsing(text: &str, expected: Option<f64>) {
        assert_eq!(parse_amount(text), expected);
    }

    fn results_table() -> TableStructure {
        TableStructure {
            headers: vec![
                "Claim Number".to_string(),
                "Member No".to_string(),
                "Patient Name".to_string(),
                "Submission Date".to_string(),
                "Net".to_string(),
                "VAT".to_string(),
                "Total".to_string(),
                "Status".to_string(),
            ],
            rows: vec![vec![
                "CLM-2025-001".to_string(),
                "MBR-44".to_string(),
                "Ahmed Ali".to_string(),
                "2025-01-20".to_string(),
                "1000.00".to_string(),
                "150.00".to_string(),
                "1,150.00".to_string(),
                "Rejected".to_string(),
            ]],
            row_count: 1,
        }
    }

    #[test]
    fn test_detect_columns() {
        let columns = ResultColumns::detect(&results_table()).unwrap();
        assert_eq!(columns.claim_number, 0);
        assert_eq!(columns.status, Some(7));
        assert_eq!(columns.net, Some(4));
    }

    #[test]
    fn test_parse_row_full() {
        let table = results_table();
        let columns = ResultColumns::detect(&table).unwrap();
        let claim = parse_row(&columns, &table.rows[0], 0).unwrap();

        assert_eq!(claim.claim_number.as_str(), "CLM-2025-001");
        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(claim.amount.net, 1000.0);
        assert_eq!(claim.amount.total, 1150.0);
        assert_eq!(claim.patient_name.as_deref(), Some("Ahmed Ali"));
    }

    #[test]
    fn test_parse_row_missing_claim_number() {
        let table = results_table();
        let columns = ResultColumns::detect(&table).unwrap();
        let mut row = table.rows[0].clone();
        row[0] = "  ".to_string();

        let err = parse_row(&columns, &row, 6).unwrap_err();
        assert!(matches!(err, DataError::RowParse { row: 6, .. }));
    }

    #[test]
    fn test_parse_row_bad_date() {
        let table = results_table();
        let columns = ResultColumns::detect(&table).unwrap();
        let mut row = table.rows[0].clone();
        row[3] = "not-a-date".to_string();

        let err = parse_row(&columns, &row, 2).unwrap_err();
        assert!(err.to_string().contains("submission date"));
    }

    #[test]
    fn test_parse_row_total_only_derives_breakdown() {
        let table = TableStructure {
            headers: vec![
                "Claim No".to_string(),
                "Date".to_string(),
                "Amount".to_string(),
            ],
            rows: vec![vec![
                "CLM-9".to_string(),
                "01/02/2025".to_string(),
                "575.00".to_string(),
            ]],
            row_count: 1,
        };
        let columns = ResultColumns::detect(&table).unwrap();
        let claim = parse_row(&columns, &table.rows[0], 0).unwrap();
        assert_eq!(claim.amount.total, 575.0);
        assert_eq!(claim.amount.net, 500.0);
    }

    #[test]
    fn test_pick_results_table_prefers_claim_headers() {
        let nav_table = TableStructure {
            headers: vec!["Menu".to_string()],
            rows: vec![vec!["Home".to_string()]; 5],
            row_count: 5,
        };
        let tables = vec![nav_table, results_table()];
        let picked = pick_results_table(&tables).unwrap();
        assert!(picked.has_header(&["claim"]));
    }

    #[test]
    fn test_pick_results_table_falls_back_to_largest() {
        let small = TableStructure {
            headers: vec!["A".to_string()],
            rows: vec![vec!["x".to_string()]],
            row_count: 1,
        };
        let big = TableStructure {
            headers: vec!["B".to_string()],
            rows: vec![vec!["y".to_string()]; 3],
            row_count: 3,
        };
        let tables = vec![small, big];
        let picked = pick_results_table(&tables).unwrap();
        assert_eq!(picked.rows.len(), 3);
    }
}

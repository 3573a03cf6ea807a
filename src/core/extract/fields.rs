//! Label-pattern field discovery
//!
//! The portal's forms carry no stable identifiers, so logical fields are
//! located through ranked candidate matchers: ordered lists of attribute
//! and label substrings, case-insensitive, in both languages. The matcher
//! that actually hit is recorded alongside the selector so fixtures can
//! assert on matcher provenance, not just end values.

use crate::core::analyze::{FieldStructure, PageStructure};

/// Ranked candidate matchers for one logical field
#[derive(Debug, Clone, Copy)]
pub struct FieldMatcher {
    /// Logical field name, used in logs and errors
    pub field: &'static str,

    /// Candidate substrings, tried in order; first hit wins
    pub candidates: &'static [&'static str],
}

/// Search-form date range start
pub const FROM_DATE: FieldMatcher = FieldMatcher {
    field: "from_date",
    candidates: &[
        "fromdate", "from_date", "datefrom", "startdate", "from", "start", "من تاريخ", "من",
    ],
};

/// Search-form date range end
pub const TO_DATE: FieldMatcher = FieldMatcher {
    field: "to_date",
    candidates: &[
        "todate", "to_date", "dateto", "enddate", "to", "end", "إلى تاريخ", "الى", "إلى",
    ],
};

/// Claim number filter
pub const CLAIM_NUMBER: FieldMatcher = FieldMatcher {
    field: "claim_number",
    candidates: &["claimnumber", "claim_no", "claimno", "claim", "رقم المطالبة", "المطالبة"],
};

/// Membership number filter
pub const MEMBERSHIP_NUMBER: FieldMatcher = FieldMatcher {
    field: "membership_number",
    candidates: &["membership", "memberno", "member", "رقم العضوية", "العضوية"],
};

/// Patient national id filter
pub const PATIENT_NATIONAL_ID: FieldMatcher = FieldMatcher {
    field: "patient_national_id",
    candidates: &["nationalid", "national_id", "iqama", "identity", "رقم الهوية", "الهوية"],
};

/// Status filter (usually a select)
pub const STATUS: FieldMatcher = FieldMatcher {
    field: "status",
    candidates: &["status", "الحالة", "حالة"],
};

/// Payer filter
pub const PAYER: FieldMatcher = FieldMatcher {
    field: "payer",
    candidates: &["payer", "insurance", "company", "شركة التأمين", "التأمين"],
};

/// Login username field
pub const USERNAME: FieldMatcher = FieldMatcher {
    field: "username",
    candidates: &["username", "userid", "user", "login", "email", "اسم المستخدم", "المستخدم"],
};

/// Login password field
pub const PASSWORD: FieldMatcher = FieldMatcher {
    field: "password",
    candidates: &["password", "pass", "كلمة المرور", "الرقم السري"],
};

/// Submit-control vocabulary, used when no `type=submit` button exists
const SUBMIT_TERMS: &[&str] = &["search", "submit", "find", "query", "بحث", "استعلام", "إرسال"];

/// Login-control vocabulary
pub const LOGIN_TERMS: &[&str] = &["login", "log in", "sign in", "دخول", "تسجيل الدخول"];

/// A located field with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// CSS selector to address the field
    pub selector: String,

    /// The candidate substring that matched
    pub matched_by: String,

    /// The field's inferred input type
    pub field_type: String,
}

fn field_matches(field: &FieldStructure, candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    field
        .match_texts()
        .iter()
        .any(|text| text.to_lowercase().contains(&candidate))
}

/// Finds a logical field in the page's forms.
///
/// Candidates are ranked: every field is checked against the first
/// candidate before the second candidate is considered, so a precise
/// `fromdate` match always beats a loose `from` match.
pub fn find_field(structure: &PageStructure, matcher: &FieldMatcher) -> Option<FieldMatch> {
    for candidate in matcher.candidates {
        let hit = structure
            .all_fields()
            .find(|field| !field.selector.is_empty() && field_matches(field, candidate));

        if let Some(field) = hit {
            tracing::debug!(
                field = matcher.field,
                matched_by = candidate,
                selector = %field.selector,
                "Field located"
            );
            return Some(FieldMatch {
                selector: field.selector.clone(),
                matched_by: (*candidate).to_string(),
                field_type: field.field_type.clone(),
            });
        }
    }
    None
}

/// Finds the visible text of the first matching submit control.
///
/// Prefers an explicit `type=submit` button; falls back to the submit
/// vocabulary.
pub fn find_submit_button(structure: &PageStructure) -> Option<String> {
    if let Some(button) = structure
        .buttons
        .iter()
        .find(|b| b.button_type.as_deref() == Some("submit") && !b.text.is_empty())
    {
        return Some(button.text.clone());
    }

    structure
        .buttons
        .iter()
        .find(|b| {
            let text = b.text.to_lowercase();
            SUBMIT_TERMS.iter().any(|t| text.contains(t))
        })
        .map(|b| b.text.clone())
}

/// Finds the visible text of the first login control.
pub fn find_login_button(structure: &PageStructure) -> Option<String> {
    structure
        .buttons
        .iter()
        .find(|b| {
            let text = b.text.to_lowercase();
            b.button_type.as_deref() == Some("submit")
                || LOGIN_TERMS.iter().any(|t| text.contains(t))
        })
        .map(|b| b.text.clone())
}

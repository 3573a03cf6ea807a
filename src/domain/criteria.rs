//! Search criteria for the portal's claim search
//!
//! Criteria are validated before any navigation happens; an invalid date
//! range never reaches the browser.

use super::claim::{ClaimStatus, ClaimType};
use super::errors::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default result page size
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound the portal accepts for a page size
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Query parameters for a claim search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Start of the submission-date window (inclusive)
    pub from_date: NaiveDate,

    /// End of the submission-date window (inclusive)
    pub to_date: NaiveDate,

    /// Exact claim number filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,

    /// Membership number filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_number: Option<String>,

    /// Patient national id filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_national_id: Option<String>,

    /// Status filter (empty = all)
    #[serde(default)]
    pub statuses: Vec<ClaimStatus>,

    /// Claim type filter (empty = all)
    #[serde(default)]
    pub claim_types: Vec<ClaimType>,

    /// Payer code filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_code: Option<String>,

    /// Result page, 1-based
    #[serde(default = "default_page")]
    pub page: u32,

    /// Rows per page, 1..=1000
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl SearchCriteria {
    /// Creates criteria covering a date window with defaults elsewhere.
    pub fn for_window(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            claim_number: None,
            membership_number: None,
            patient_national_id: None,
            statuses: Vec::new(),
            claim_types: Vec::new(),
            payer_code: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }

    /// Creates a new builder
    pub fn builder() -> SearchCriteriaBuilder {
        SearchCriteriaBuilder::default()
    }

    /// Validates the criteria.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidCriteria`] when `from_date > to_date`
    /// or pagination is out of range. Callers must invoke this before
    /// driving any navigation.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.from_date > self.to_date {
            return Err(DataError::InvalidCriteria(format!(
                "from_date {} is after to_date {}",
                self.from_date, self.to_date
            )));
        }
        if self.page < 1 {
            return Err(DataError::InvalidCriteria(
                "page must be >= 1".to_string(),
            ));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(DataError::InvalidCriteria(format!(
                "page_size must be within 1..={MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    /// Returns a copy advanced to the next result page.
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.page += 1;
        next
    }
}

/// Builder for constructing SearchCriteria
#[derive(Debug, Default)]
pub struct SearchCriteriaBuilder {
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    claim_number: Option<String>,
    membership_number: Option<String>,
    patient_national_id: Option<String>,
    statuses: Vec<ClaimStatus>,
    claim_types: Vec<ClaimType>,
    payer_code: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
}

impl SearchCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, v: NaiveDate) -> Self {
        self.from_date = Some(v);
        self
    }

    pub fn to_date(mut self, v: NaiveDate) -> Self {
        self.to_date = Some(v);
        self
    }

    pub fn claim_number(mut self, v: impl Into<String>) -> Self {
        self.claim_number = Some(v.into());
        self
    }

    pub fn membership_number(mut self, v: impl Into<String>) -> Self {
        self.membership_number = Some(v.into());
        self
    }

    pub fn patient_national_id(mut self, v: impl Into<String>) -> Self {
        self.patient_national_id = Some(v.into());
        self
    }

    pub fn status(mut self, v: ClaimStatus) -> Self {
        self.statuses.push(v);
        self
    }

    pub fn claim_type(mut self, v: ClaimType) -> Self {
        self.claim_types.push(v);
        self
    }

    pub fn payer_code(mut self, v: impl Into<String>) -> Self {
        self.payer_code = Some(v.into());
        self
    }

    pub fn page(mut self, v: u32) -> Self {
        self.page = Some(v);
        self
    }

    pub fn page_size(mut self, v: u32) -> Self {
        self.page_size = Some(v);
        self
    }

    /// Builds and validates the criteria.
    ///
    /// # Errors
    ///
    /// Returns an error when required fields are missing or validation
    /// fails.
    pub fn build(self) -> Result<SearchCriteria, DataError> {
        let criteria = SearchCriteria {
            from_date: self
                .from_date
                .ok_or_else(|| DataError::InvalidCriteria("from_date is required".to_string()))?,
            to_date: self
                .to_date
                .ok_or_else(|| DataError::InvalidCriteria("to_date is required".to_string()))?,
            claim_number: self.claim_number,
            membership_number: self.membership_number,
            patient_national_id: self.patient_national_id,
            statuses: self.statuses,
            claim_types: self.claim_types,
            payer_code: self.payer_code,
            page: self.page.unwrap_or_else(default_page),
            page_size: self.page_size.unwrap_or_else(default_page_size),
        };
        criteria.validate()?;
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_valid_window() {
        let criteria = SearchCriteria::for_window(date("2025-01-01"), date("2025-01-31"));
        assert!(criteria.validate().is_ok());
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let criteria = SearchCriteria::for_window(date("2025-02-01"), date("2025-01-01"));
        let err = criteria.validate().unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn test_same_day_window_is_valid() {
        let criteria = SearchCriteria::for_window(date("2025-01-15"), date("2025-01-15"));
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut criteria = SearchCriteria::for_window(date("2025-01-01"), date("2025-01-31"));
        criteria.page_size = 0;
        assert!(criteria.validate().is_err());
        criteria.page_size = 1001;
        assert!(criteria.validate().is_err());
        criteria.page_size = 1000;
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_builder_validates_on_build() {
        let result = SearchCriteria::builder()
            .from_date(date("2025-03-01"))
            .to_date(date("2025-02-01"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_full() {
        let criteria = SearchCriteria::builder()
            .from_date(date("2025-01-01"))
            .to_date(date("2025-01-31"))
            .claim_number("CLM-1")
            .status(ClaimStatus::Rejected)
            .claim_type(ClaimType::Outpatient)
            .page_size(50)
            .build()
            .unwrap();

        assert_eq!(criteria.claim_number.as_deref(), Some("CLM-1"));
        assert_eq!(criteria.statuses, vec![ClaimStatus::Rejected]);
        assert_eq!(criteria.page_size, 50);
    }

    #[test]
    fn test_next_page_advances_only_page() {
        let criteria = SearchCriteria::for_window(date("2025-01-01"), date("2025-01-31"));
        let next = criteria.next_page();
        assert_eq!(next.page, 2);
        assert_eq!(next.page_size, criteria.page_size);
        assert_eq!(next.from_date, criteria.from_date);
    }
}

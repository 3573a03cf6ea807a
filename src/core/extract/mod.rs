//! Data extraction
//!
//! Issues claim searches, parses result tables into portal claims, and
//! drills into detail pages for rejection-specific fields. All heuristics
//! are tolerant: a row or label that cannot be read is reported and
//! skipped, never allowed to abort a page.

pub mod extractor;
pub mod fields;
pub mod rows;

pub use extractor::{parse_results, rejection_details, search, RowFailure, SearchResult};
pub use fields::{find_field, find_login_button, find_submit_button, FieldMatch, FieldMatcher};
pub use rows::{map_status_text, parse_amount, parse_date, ResultColumns};

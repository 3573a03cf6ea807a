//! Result type alias for the pipeline
//!
//! This module provides a convenient Result type alias that uses OasisError
//! as the error type.

use super::errors::OasisError;

/// Result type alias for pipeline operations
///
/// This is a convenience type alias that uses `OasisError` as the error type.
/// Use this throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, OasisError>;

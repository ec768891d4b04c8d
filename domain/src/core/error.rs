//! Domain error types

use chrono::NaiveDate;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid day count {0}: must be at least 1")]
    InvalidDayCount(i64),

    #[error("Range of {days} days exceeds the limit of {max}")]
    RangeTooLong { days: i64, max: i64 },

    #[error("No label found matching '{0}'")]
    LabelNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DomainError {
    /// Check if this error is an unresolved label lookup
    pub fn is_label_not_found(&self) -> bool {
        matches!(self, DomainError::LabelNotFound(_))
    }
}

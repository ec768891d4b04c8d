//! Calendar-date helpers.
//!
//! Every date the service exchanges is a `YYYY-MM-DD` string with no
//! time-of-day component.

use super::error::DomainError;
use chrono::NaiveDate;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a caller-supplied `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

/// Parse a date stored on a document.
///
/// Documents sometimes carry sentinels such as `"unassigned"` or a full
/// timestamp; only the leading calendar date is considered.
pub fn parse_document_date(value: &str) -> Option<NaiveDate> {
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

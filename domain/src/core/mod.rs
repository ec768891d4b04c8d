//! Core domain concepts shared across all subdomains.
//!
//! - [`date`] — calendar-date parsing and formatting
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — UTF-8 safe string helpers

pub mod date;
pub mod error;
pub mod string;

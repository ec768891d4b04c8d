//! Completion analytics
//!
//! Pure aggregation over completed and scheduled items. Fetching lives in
//! the application layer; failed days arrive here as [`DayOutcome::Failed`]
//! and are summarized as zero-count days with a warning.

pub mod completed;
pub mod overview;
pub mod range;

pub use completed::CompletedForDate;
pub use overview::{DailyOverview, OverviewCounts, ProjectOverview};
pub use range::{DateRange, DayOutcome, DaySummary, RangeRequest, RangeSummary};

//! Date ranges and per-day range summaries

use crate::core::date::format_date;
use crate::core::error::DomainError;
use crate::document::TaskDocument;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Caller parameters for a range summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeRequest {
    pub days: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days ending on `end`, inclusive.
    pub fn ending_on(end: NaiveDate, days: i64) -> Result<Self, DomainError> {
        if days < 1 {
            return Err(DomainError::InvalidDayCount(days));
        }
        let start = end
            .checked_sub_days(Days::new((days - 1) as u64))
            .ok_or(DomainError::InvalidDayCount(days))?;
        Self::new(start, end)
    }

    /// Resolve caller parameters against `today`.
    ///
    /// An explicit start date wins over a day count; the end date defaults
    /// to `today`. Without a start date the range covers `days` (or
    /// `default_days`) days ending on the end date. Ranges longer than
    /// `max_days` are rejected before any day is enumerated.
    pub fn resolve(
        request: RangeRequest,
        today: NaiveDate,
        default_days: i64,
        max_days: i64,
    ) -> Result<Self, DomainError> {
        let end = request.end.unwrap_or(today);
        let range = match request.start {
            Some(start) => Self::new(start, end)?,
            None => {
                let days = request.days.unwrap_or(default_days);
                if days > max_days {
                    return Err(DomainError::RangeTooLong { days, max: max_days });
                }
                Self::ending_on(end, days)?
            }
        };
        let days = (range.end - range.start).num_days() + 1;
        if days > max_days {
            return Err(DomainError::RangeTooLong { days, max: max_days });
        }
        Ok(range)
    }

    /// Every day in the range, ascending
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }

    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }
}

/// One day's fetch result inside a range.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Fetched {
        date: NaiveDate,
        items: Vec<TaskDocument>,
    },
    Failed {
        date: NaiveDate,
        reason: String,
    },
}

impl DayOutcome {
    pub fn date(&self) -> NaiveDate {
        match self {
            DayOutcome::Fetched { date, .. } | DayOutcome::Failed { date, .. } => *date,
        }
    }
}

/// Completions for one day of a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed_count: usize,
    pub tasks: Vec<TaskDocument>,
    /// False when the day's fetch failed and contributes nothing
    pub fetched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Merged completions over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_analyzed: usize,
    pub total_completed: usize,
    pub average_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_productive_day: Option<NaiveDate>,
    pub completed_by_project: BTreeMap<String, usize>,
    pub unassigned_count: usize,
    pub daily: Vec<DaySummary>,
    pub failed_days: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// One upstream call per day
    pub api_calls_made: usize,
}

impl RangeSummary {
    /// Merge day outcomes in any order. Failed days count as zero.
    pub fn from_outcomes(range: DateRange, outcomes: Vec<DayOutcome>) -> Self {
        let api_calls_made = outcomes.len();
        let mut outcomes = outcomes;
        outcomes.sort_by_key(DayOutcome::date);

        let mut daily = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();
        let mut completed_by_project: BTreeMap<String, usize> = BTreeMap::new();
        let mut unassigned_count = 0;

        for outcome in outcomes {
            match outcome {
                DayOutcome::Fetched { date, items } => {
                    for item in &items {
                        match item.parent_id() {
                            Some(parent) if !item.is_unassigned() => {
                                *completed_by_project.entry(parent.to_string()).or_default() += 1;
                            }
                            _ => unassigned_count += 1,
                        }
                    }
                    daily.push(DaySummary {
                        date,
                        completed_count: items.len(),
                        tasks: items,
                        fetched: true,
                        warning: None,
                    });
                }
                DayOutcome::Failed { date, reason } => {
                    let warning = format!("Could not fetch completions for {}: {}", format_date(date), reason);
                    warnings.push(warning.clone());
                    daily.push(DaySummary {
                        date,
                        completed_count: 0,
                        tasks: Vec::new(),
                        fetched: false,
                        warning: Some(warning),
                    });
                }
            }
        }

        let total_completed: usize = daily.iter().map(|d| d.completed_count).sum();
        let most_productive_day = daily
            .iter()
            .filter(|d| d.completed_count > 0)
            .fold(None::<&DaySummary>, |best, day| match best {
                Some(best) if best.completed_count >= day.completed_count => Some(best),
                _ => Some(day),
            })
            .map(|d| d.date);
        let days_analyzed = range.day_count();

        Self {
            start_date: range.start,
            end_date: range.end,
            days_analyzed,
            total_completed,
            average_per_day: total_completed as f64 / days_analyzed as f64,
            most_productive_day,
            completed_by_project,
            unassigned_count,
            failed_days: daily.iter().filter(|d| !d.fetched).count(),
            daily,
            warnings,
            api_calls_made,
        }
    }
}

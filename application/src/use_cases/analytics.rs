//! Analytics use case
//!
//! Completion history and daily snapshots built from the date-scoped
//! endpoints. Range summaries issue one `/doneItems` call per day with
//! bounded fan-out; a failed day is recorded as a [`DayOutcome::Failed`] and
//! the rest of the range still counts.

use crate::config::AggregationSettings;
use crate::ports::task_service::{ServiceError, TaskServicePort, endpoints};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use marvin_domain::{
    CompletedForDate, DailyOverview, DateRange, DayOutcome, DomainError, ProjectOverview,
    RangeRequest, RangeSummary, TaskDocument, format_date,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Days covered by [`AnalyticsUseCase::recent_completions`]
pub const RECENT_COMPLETION_DAYS: i64 = 7;

/// Errors that can occur in analytics
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AnalyticsError {
    /// The endpoint that was being attempted, if any call was made
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            AnalyticsError::Domain(_) => None,
            AnalyticsError::Service(e) => Some(e.endpoint()),
        }
    }
}

/// Use case for completion analytics and daily snapshots
pub struct AnalyticsUseCase<S: TaskServicePort + 'static> {
    service: Arc<S>,
    settings: AggregationSettings,
}

impl<S: TaskServicePort + 'static> AnalyticsUseCase<S> {
    pub fn new(service: Arc<S>, settings: AggregationSettings) -> Self {
        Self { service, settings }
    }

    /// Completed items for one date, grouped by parent (one call)
    pub async fn completed_for_date(&self, date: NaiveDate) -> Result<CompletedForDate, ServiceError> {
        let items = self.service.done_items(Some(date)).await?;
        debug!(date = %format_date(date), completed = items.len(), "Fetched completions");
        Ok(CompletedForDate::group(date, items))
    }

    /// Merged completions over a range, one call per day.
    pub async fn range_summary(
        &self,
        request: RangeRequest,
        today: NaiveDate,
    ) -> Result<RangeSummary, AnalyticsError> {
        let range = DateRange::resolve(
            request,
            today,
            self.settings.range_default_days,
            self.settings.range_max_days,
        )?;
        info!(
            start = %format_date(range.start),
            end = %format_date(range.end),
            days = range.day_count(),
            "Summarizing completions"
        );

        let outcomes: Vec<DayOutcome> = stream::iter(range.days())
            .map(|day| self.fetch_day(day))
            .buffer_unordered(self.settings.concurrency())
            .collect()
            .await;

        let summary = RangeSummary::from_outcomes(range, outcomes);
        if summary.failed_days > 0 {
            warn!(
                failed_days = summary.failed_days,
                "Range summary is partial"
            );
        }
        Ok(summary)
    }

    /// Range summary over the past week, ending today
    pub async fn recent_completions(&self, today: NaiveDate) -> Result<RangeSummary, AnalyticsError> {
        let request = RangeRequest {
            days: Some(RECENT_COMPLETION_DAYS),
            ..Default::default()
        };
        self.range_summary(request, today).await
    }

    /// Today's scheduled, due and completed items in one snapshot (three calls)
    pub async fn daily_overview(&self, today: NaiveDate) -> Result<DailyOverview, ServiceError> {
        let (today_items, due_items, done_items) = futures::try_join!(
            self.service.today_items(Some(today)),
            self.service.due_items(),
            self.service.done_items(Some(today)),
        )?;
        Ok(DailyOverview::build(today, today_items, due_items, done_items))
    }

    /// One project's record and direct children (two calls)
    pub async fn project_overview(&self, project_id: &str) -> Result<ProjectOverview, ServiceError> {
        let categories = self.service.categories().await?;
        let project = categories
            .into_iter()
            .find(|c| c.id() == Some(project_id));
        if project.is_none() {
            debug!(project_id, "Project not found among categories");
        }

        let children = match self.service.children(project_id).await {
            Ok(children) => children,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(ProjectOverview::build(project_id, project, children))
    }

    /// Items for a given date.
    ///
    /// Only the scheduled-items endpoint is consulted, so completed items
    /// that were not scheduled for `date` are not included. A failed fetch
    /// yields an empty list.
    pub async fn items_for_date(&self, date: NaiveDate) -> Vec<TaskDocument> {
        match self.service.today_items(Some(date)).await {
            Ok(items) => items,
            Err(e) => {
                warn!(date = %format_date(date), endpoint = e.endpoint(), error = %e, "Could not get items for date");
                Vec::new()
            }
        }
    }

    async fn fetch_day(&self, date: NaiveDate) -> DayOutcome {
        match self.service.done_items(Some(date)).await {
            Ok(items) => DayOutcome::Fetched { date, items },
            Err(e) => {
                warn!(
                    date = %format_date(date),
                    endpoint = endpoints::DONE_ITEMS,
                    error = %e,
                    "Counting day as empty after failed fetch"
                );
                DayOutcome::Failed {
                    date,
                    reason: e.to_string(),
                }
            }
        }
    }
}

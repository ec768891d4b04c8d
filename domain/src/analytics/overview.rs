//! Daily and per-project snapshots

use crate::document::{TaskDocument, fields};
use chrono::NaiveDate;
use serde::Serialize;

/// Today's work: scheduled, overdue, due today and completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOverview {
    pub date: NaiveDate,
    pub scheduled_today: Vec<TaskDocument>,
    pub overdue: Vec<TaskDocument>,
    pub due_today: Vec<TaskDocument>,
    pub completed_today: Vec<TaskDocument>,
    pub counts: OverviewCounts,
    /// Completed share of today's scheduled plus completed work, 0–100
    pub completion_rate: f64,
    pub planning_hints: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverviewCounts {
    pub scheduled_pending: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub completed_today: usize,
}

impl DailyOverview {
    /// Combine the three snapshot sources into one overview.
    pub fn build(
        today: NaiveDate,
        today_items: Vec<TaskDocument>,
        due_items: Vec<TaskDocument>,
        done_items: Vec<TaskDocument>,
    ) -> Self {
        let scheduled_today: Vec<_> = today_items.into_iter().filter(|t| !t.is_done()).collect();

        let (overdue, due_today): (Vec<_>, Vec<_>) = due_items
            .into_iter()
            .filter(|t| !t.is_done())
            .filter(|t| t.due_date().is_some_and(|due| due <= today))
            .partition(|t| t.due_date().is_some_and(|due| due < today));

        let counts = OverviewCounts {
            scheduled_pending: scheduled_today.len(),
            overdue: overdue.len(),
            due_today: due_today.len(),
            completed_today: done_items.len(),
        };

        let planned = counts.scheduled_pending + counts.completed_today;
        let completion_rate = if planned == 0 {
            0.0
        } else {
            (counts.completed_today as f64 / planned as f64 * 1000.0).round() / 10.0
        };

        Self {
            date: today,
            planning_hints: planning_hints(&counts),
            scheduled_today,
            overdue,
            due_today,
            completed_today: done_items,
            counts,
            completion_rate,
        }
    }
}

fn planning_hints(counts: &OverviewCounts) -> Vec<String> {
    let mut hints = Vec::new();
    if counts.overdue > 0 {
        hints.push(format!(
            "{} overdue item(s): reschedule or finish them first",
            counts.overdue
        ));
    }
    if counts.due_today > 0 {
        hints.push(format!("{} item(s) due today", counts.due_today));
    }
    if counts.scheduled_pending == 0 && counts.completed_today == 0 {
        hints.push("Nothing scheduled for today".to_string());
    } else if counts.scheduled_pending == 0 {
        hints.push("All scheduled work for today is done".to_string());
    } else if counts.scheduled_pending > 10 {
        hints.push(format!(
            "{} items still scheduled: consider deferring some",
            counts.scheduled_pending
        ));
    }
    hints
}

/// One project's tasks split by completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOverview {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<TaskDocument>,
    pub pending_tasks: Vec<TaskDocument>,
    pub completed_tasks: Vec<TaskDocument>,
    pub sub_projects: Vec<TaskDocument>,
    pub task_count: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub completion_percentage: f64,
}

impl ProjectOverview {
    /// Build from the project record (if found among categories) and its direct children.
    pub fn build(
        project_id: impl Into<String>,
        project: Option<TaskDocument>,
        children: Vec<TaskDocument>,
    ) -> Self {
        let (sub_projects, tasks): (Vec<_>, Vec<_>) =
            children.into_iter().partition(TaskDocument::is_container);
        let (completed_tasks, pending_tasks): (Vec<_>, Vec<_>) =
            tasks.into_iter().partition(TaskDocument::is_done);

        let task_count = completed_tasks.len() + pending_tasks.len();
        let completion_percentage = if task_count == 0 {
            0.0
        } else {
            (completed_tasks.len() as f64 / task_count as f64 * 1000.0).round() / 10.0
        };

        Self {
            project_id: project_id.into(),
            title: project
                .as_ref()
                .and_then(|p| p.get(fields::TITLE))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            project,
            task_count,
            pending_count: pending_tasks.len(),
            completed_count: completed_tasks.len(),
            pending_tasks,
            completed_tasks,
            sub_projects,
            completion_percentage,
        }
    }
}

//! Completed items grouped by parent container

use crate::core::date::format_date;
use crate::document::TaskDocument;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Completions for one calendar day, flat and grouped by parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedForDate {
    pub date: NaiveDate,
    pub total_completed: usize,
    pub completed_by_project: BTreeMap<String, Vec<TaskDocument>>,
    pub unassigned_completed: Vec<TaskDocument>,
    pub project_count: usize,
    pub unassigned_count: usize,
    pub all_completed: Vec<TaskDocument>,
    pub source: String,
}

impl CompletedForDate {
    /// Group `items` by parent id; missing or `"unassigned"` parents form their own bucket.
    pub fn group(date: NaiveDate, items: Vec<TaskDocument>) -> Self {
        let mut completed_by_project: BTreeMap<String, Vec<TaskDocument>> = BTreeMap::new();
        let mut unassigned_completed = Vec::new();

        for item in &items {
            match item.parent_id() {
                Some(parent) if !item.is_unassigned() => completed_by_project
                    .entry(parent.to_string())
                    .or_default()
                    .push(item.clone()),
                _ => unassigned_completed.push(item.clone()),
            }
        }

        Self {
            date,
            total_completed: items.len(),
            project_count: completed_by_project.len(),
            unassigned_count: unassigned_completed.len(),
            completed_by_project,
            unassigned_completed,
            all_completed: items,
            source: format!("/doneItems?date={}", format_date(date)),
        }
    }
}

//! In-memory filter evaluation
//!
//! Applies the same predicates as [`build_selector`](super::selector::build_selector)
//! to documents that were collected by tree traversal.

use super::filter::{LabelResolution, TaskFilter};
use crate::core::string::contains_ignore_case;
use crate::document::TaskDocument;

/// Evaluates a [`TaskFilter`] against individual documents.
#[derive(Debug, Clone)]
pub struct FilterEvaluator<'a> {
    filter: &'a TaskFilter,
    label_id: Option<&'a str>,
    label_unresolved: bool,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(filter: &'a TaskFilter, label: &'a LabelResolution) -> Self {
        Self {
            filter,
            label_id: label.label_id(),
            label_unresolved: matches!(label, LabelResolution::NotFound(_)),
        }
    }

    /// Whether `document` is a task that satisfies every active predicate.
    ///
    /// Container documents never match. A missing `isStarred` counts as
    /// unstarred.
    pub fn matches(&self, document: &TaskDocument) -> bool {
        if document.is_container() || self.label_unresolved {
            return false;
        }
        if !self.filter.include_done && document.is_done() {
            return false;
        }
        if let Some(label_id) = self.label_id
            && !document.has_label(label_id)
        {
            return false;
        }
        if let Some(text) = &self.filter.contains {
            let in_title = document.title().is_some_and(|t| contains_ignore_case(t, text));
            let in_note = document.note().is_some_and(|n| contains_ignore_case(n, text));
            if !in_title && !in_note {
                return false;
            }
        }
        if !self.filter.due.matches(document.due_date()) {
            return false;
        }
        if !self.filter.scheduled.matches(document.day()) {
            return false;
        }
        if let Some(parent_id) = &self.filter.parent_id
            && document.parent_id() != Some(parent_id.as_str())
        {
            return false;
        }
        if let Some(starred) = self.filter.starred
            && document.is_starred() != starred
        {
            return false;
        }
        true
    }

    /// Keep the matching documents, preserving order.
    pub fn apply(&self, documents: Vec<TaskDocument>) -> Vec<TaskDocument> {
        documents.into_iter().filter(|d| self.matches(d)).collect()
    }
}

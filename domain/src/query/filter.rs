//! Filter request value objects
//!
//! [`TaskFilter`] is the single description of "which tasks" shared by the
//! store path (pushed down into a selector) and the traversal path (applied
//! in memory). Date precedence is settled when the filter is built: an exact
//! date replaces any before/after bounds for the same dimension.

use super::projection::FieldProjection;
use crate::core::date::format_date;
use crate::core::error::DomainError;
use crate::document::Label;
use chrono::NaiveDate;

/// Constraint on one date dimension (due or scheduled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// No constraint
    #[default]
    Any,
    /// Exactly this date
    On(NaiveDate),
    /// Inclusive bounds; at least one side is set
    Range {
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Combine the three caller parameters for one dimension.
    ///
    /// `exact` wins over `before`/`after` when present.
    pub fn from_parts(
        exact: Option<NaiveDate>,
        before: Option<NaiveDate>,
        after: Option<NaiveDate>,
    ) -> Self {
        match (exact, before, after) {
            (Some(date), _, _) => DateFilter::On(date),
            (None, None, None) => DateFilter::Any,
            (None, before, after) => DateFilter::Range { after, before },
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, DateFilter::Any)
    }

    /// Whether a document date satisfies the constraint.
    ///
    /// Documents without a date only satisfy [`DateFilter::Any`].
    pub fn matches(&self, value: Option<NaiveDate>) -> bool {
        match self {
            DateFilter::Any => true,
            DateFilter::On(date) => value == Some(*date),
            DateFilter::Range { after, before } => match value {
                None => false,
                Some(value) => {
                    after.is_none_or(|after| value >= after)
                        && before.is_none_or(|before| value <= before)
                }
            },
        }
    }

    fn describe(&self, name: &str, out: &mut Vec<String>) {
        match self {
            DateFilter::Any => {}
            DateFilter::On(date) => out.push(format!("{}={}", name, format_date(*date))),
            DateFilter::Range { after, before } => {
                if let Some(after) = after {
                    out.push(format!("{}>={}", name, format_date(*after)));
                }
                if let Some(before) = before {
                    out.push(format!("{}<={}", name, format_date(*before)));
                }
            }
        }
    }
}

/// Outcome of resolving a label name against the label list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelResolution {
    /// The filter has no label constraint
    NotRequested,
    /// The label name resolved to this identifier
    Resolved { name: String, id: String },
    /// No label carries this name
    NotFound(String),
}

impl LabelResolution {
    pub fn resolve(name: Option<&str>, labels: &[Label]) -> Self {
        match name {
            None => LabelResolution::NotRequested,
            Some(name) => match Label::find_by_name(labels, name) {
                Some(label) => LabelResolution::Resolved {
                    name: name.to_string(),
                    id: label.id.clone(),
                },
                None => LabelResolution::NotFound(name.to_string()),
            },
        }
    }

    pub fn label_id(&self) -> Option<&str> {
        match self {
            LabelResolution::Resolved { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Fail with [`DomainError::LabelNotFound`] when the name did not resolve.
    pub fn require_resolved(&self) -> Result<Option<&str>, DomainError> {
        match self {
            LabelResolution::NotRequested => Ok(None),
            LabelResolution::Resolved { id, .. } => Ok(Some(id)),
            LabelResolution::NotFound(name) => Err(DomainError::LabelNotFound(name.clone())),
        }
    }
}

/// Which tasks a caller wants and which fields to return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub label: Option<String>,
    pub include_done: bool,
    pub contains: Option<String>,
    pub due: DateFilter,
    pub scheduled: DateFilter,
    pub parent_id: Option<String>,
    pub starred: Option<bool>,
    pub fields: Option<FieldProjection>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn including_done(mut self) -> Self {
        self.include_done = true;
        self
    }

    pub fn containing(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.contains = if text.is_empty() { None } else { Some(text) };
        self
    }

    pub fn with_due(
        mut self,
        exact: Option<NaiveDate>,
        before: Option<NaiveDate>,
        after: Option<NaiveDate>,
    ) -> Self {
        self.due = DateFilter::from_parts(exact, before, after);
        self
    }

    pub fn with_scheduled(
        mut self,
        exact: Option<NaiveDate>,
        before: Option<NaiveDate>,
        after: Option<NaiveDate>,
    ) -> Self {
        self.scheduled = DateFilter::from_parts(exact, before, after);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = FieldProjection::from_requested(fields);
        self
    }

    /// Human-readable list of the active constraints, used in summaries.
    pub fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(label) = &self.label {
            out.push(format!("label='{}'", label));
        }
        if let Some(text) = &self.contains {
            out.push(format!("contains='{}'", text));
        }
        self.due.describe("due", &mut out);
        self.scheduled.describe("scheduled", &mut out);
        if let Some(parent) = &self.parent_id {
            out.push(format!("parent={}", parent));
        }
        if let Some(starred) = self.starred {
            out.push(format!("starred={}", if starred { "yes" } else { "no" }));
        }
        if self.include_done {
            out.push("include_done".to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        crate::core::date::parse_date(s).unwrap()
    }

    #[test]
    fn test_exact_date_takes_precedence() {
        let filter = DateFilter::from_parts(
            Some(date("2025-06-10")),
            Some(date("2025-06-30")),
            Some(date("2025-06-01")),
        );
        assert_eq!(filter, DateFilter::On(date("2025-06-10")));
    }

    #[test]
    fn test_range_from_bounds() {
        assert_eq!(DateFilter::from_parts(None, None, None), DateFilter::Any);
        assert_eq!(
            DateFilter::from_parts(None, Some(date("2025-06-30")), None),
            DateFilter::Range {
                after: None,
                before: Some(date("2025-06-30"))
            }
        );
    }

    #[test]
    fn test_date_filter_matches() {
        let on = DateFilter::On(date("2025-06-10"));
        assert!(on.matches(Some(date("2025-06-10"))));
        assert!(!on.matches(Some(date("2025-06-11"))));
        assert!(!on.matches(None));

        let range = DateFilter::from_parts(None, Some(date("2025-06-30")), Some(date("2025-06-01")));
        assert!(range.matches(Some(date("2025-06-01"))));
        assert!(range.matches(Some(date("2025-06-30"))));
        assert!(!range.matches(Some(date("2025-07-01"))));
        assert!(!range.matches(None));

        assert!(DateFilter::Any.matches(None));
    }

    #[test]
    fn test_label_resolution() {
        let labels = vec![Label::new("l1", "Urgent")];

        assert_eq!(LabelResolution::resolve(None, &labels), LabelResolution::NotRequested);
        let resolved = LabelResolution::resolve(Some("URGENT"), &labels);
        assert_eq!(resolved.label_id(), Some("l1"));
        assert_eq!(resolved.require_resolved(), Ok(Some("l1")));

        let missing = LabelResolution::resolve(Some("Nope"), &labels);
        assert_eq!(missing, LabelResolution::NotFound("Nope".to_string()));
        assert!(missing.require_resolved().unwrap_err().is_label_not_found());
    }

    #[test]
    fn test_describe_lists_resolved_constraints_only() {
        let filter = TaskFilter::new()
            .with_label("Urgent")
            .containing("report")
            .with_due(Some(date("2025-06-10")), Some(date("2025-06-30")), None)
            .starred(false);

        assert_eq!(
            filter.describe(),
            vec![
                "label='Urgent'".to_string(),
                "contains='report'".to_string(),
                "due=2025-06-10".to_string(),
                "starred=no".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_contains_is_ignored() {
        assert!(TaskFilter::new().containing("").contains.is_none());
    }
}

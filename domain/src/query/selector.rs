//! Document-store selector builder
//!
//! Translates a [`TaskFilter`] into a Mango selector for the store's `_find`
//! endpoint. All clauses are combined with an implicit AND:
//!
//! | Filter | Clause |
//! |--------|--------|
//! | always | `"db": "Tasks"` |
//! | `include_done == false` | `"done": {"$ne": true}` |
//! | label | `"labelIds": {"$elemMatch": {"$eq": <id>}}` |
//! | contains | `"$or": [{"title": {"$regex": "(?i)…"}}, {"note": {"$regex": "(?i)…"}}]` |
//! | due / scheduled | exact string, or `{"$gte": after, "$lte": before}` |
//! | parent | `"parentId": <id>` |
//! | starred | `"isStarred": 1` or `0` |

use super::filter::{DateFilter, LabelResolution, TaskFilter};
use crate::core::date::format_date;
use crate::core::error::DomainError;
use crate::document::fields;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Collection tag carried by every task document in the store
pub const TASKS_COLLECTION: &str = "Tasks";

/// A Mango selector expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Selector(Map<String, Value>);

impl Selector {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn clause_count(&self) -> usize {
        self.0.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

/// Build the selector for `filter`.
///
/// A label that failed to resolve is an error rather than a missing clause:
/// dropping the clause would silently widen the query to every task.
pub fn build_selector(
    filter: &TaskFilter,
    label: &LabelResolution,
) -> Result<Selector, DomainError> {
    let mut selector = Selector(Map::new());
    selector.insert(fields::DB, json!(TASKS_COLLECTION));

    if !filter.include_done {
        selector.insert(fields::DONE, json!({"$ne": true}));
    }

    if let Some(label_id) = label.require_resolved()? {
        selector.insert(fields::LABEL_IDS, json!({"$elemMatch": {"$eq": label_id}}));
    }

    if let Some(text) = &filter.contains {
        let pattern = case_insensitive_pattern(text);
        selector.insert(
            "$or",
            json!([
                {"title": {"$regex": pattern}},
                {"note": {"$regex": pattern}},
            ]),
        );
    }

    if let Some(clause) = date_clause(&filter.due) {
        selector.insert(fields::DUE_DATE, clause);
    }
    if let Some(clause) = date_clause(&filter.scheduled) {
        selector.insert(fields::DAY, clause);
    }

    if let Some(parent_id) = &filter.parent_id {
        selector.insert(fields::PARENT_ID, json!(parent_id));
    }
    if let Some(starred) = filter.starred {
        selector.insert(fields::IS_STARRED, json!(if starred { 1 } else { 0 }));
    }

    Ok(selector)
}

/// Literal, case-insensitive regex for the store's `$regex` operator.
pub fn case_insensitive_pattern(text: &str) -> String {
    format!("(?i){}", regex::escape(text))
}

fn date_clause(filter: &DateFilter) -> Option<Value> {
    match filter {
        DateFilter::Any => None,
        DateFilter::On(date) => Some(json!(format_date(*date))),
        DateFilter::Range { after, before } => {
            let mut range = Map::new();
            if let Some(after) = after {
                range.insert("$gte".to_string(), json!(format_date(*after)));
            }
            if let Some(before) = before {
                range.insert("$lte".to_string(), json!(format_date(*before)));
            }
            if range.is_empty() {
                None
            } else {
                Some(Value::Object(range))
            }
        }
    }
}

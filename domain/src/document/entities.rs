//! Document entities
//!
//! The service stores tasks, projects and categories as loosely-typed JSON
//! documents. [`TaskDocument`] keeps the raw field map so that field
//! projection can return exactly what the caller asked for, and exposes
//! typed accessors for the fields aggregation and filtering depend on.

use crate::core::date::parse_document_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known document field names
pub mod fields {
    pub const ID: &str = "_id";
    pub const TITLE: &str = "title";
    pub const NOTE: &str = "note";
    pub const PARENT_ID: &str = "parentId";
    pub const TYPE: &str = "type";
    pub const DB: &str = "db";
    pub const DONE: &str = "done";
    pub const DONE_AT: &str = "doneAt";
    pub const DAY: &str = "day";
    pub const DUE_DATE: &str = "dueDate";
    pub const IS_STARRED: &str = "isStarred";
    pub const LABEL_IDS: &str = "labelIds";
    pub const RANK: &str = "rank";
}

/// Parent reference used by the service for items outside any container
pub const UNASSIGNED_PARENT: &str = "unassigned";

/// Type discriminator of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Task,
    Project,
    Category,
}

impl DocumentKind {
    /// Classify a raw `type` field. Anything that is not a container type is a task.
    pub fn from_type_field(value: Option<&str>) -> Self {
        match value {
            Some("project") => DocumentKind::Project,
            Some("category") => DocumentKind::Category,
            _ => DocumentKind::Task,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, DocumentKind::Task)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentKind::Task => "task",
            DocumentKind::Project => "project",
            DocumentKind::Category => "category",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task, project or category document as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDocument {
    fields: Map<String, Value>,
}

impl TaskDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; non-object values are not documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Convert a JSON array of documents, dropping non-object entries.
    pub fn from_array(value: Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.into_iter().filter_map(Self::from_value).collect(),
            _ => Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field(fields::ID)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field(fields::TITLE)
    }

    pub fn note(&self) -> Option<&str> {
        self.str_field(fields::NOTE)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.str_field(fields::PARENT_ID)
    }

    /// True when the document has no parent or the explicit unassigned sentinel.
    pub fn is_unassigned(&self) -> bool {
        match self.parent_id() {
            None => true,
            Some(parent) => parent.is_empty() || parent == UNASSIGNED_PARENT,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_type_field(self.str_field(fields::TYPE))
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_done(&self) -> bool {
        matches!(self.fields.get(fields::DONE), Some(Value::Bool(true)))
    }

    /// Completion timestamp in epoch milliseconds
    pub fn done_at(&self) -> Option<i64> {
        self.fields.get(fields::DONE_AT).and_then(Value::as_i64)
    }

    /// Scheduled calendar date
    pub fn day(&self) -> Option<NaiveDate> {
        self.str_field(fields::DAY).and_then(parse_document_date)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.str_field(fields::DUE_DATE).and_then(parse_document_date)
    }

    /// Starred flag; stored as a number on the wire, occasionally as a bool.
    pub fn is_starred(&self) -> bool {
        match self.fields.get(fields::IS_STARRED) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v > 0.0),
            _ => false,
        }
    }

    pub fn label_ids(&self) -> Vec<&str> {
        self.fields
            .get(fields::LABEL_IDS)
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_label(&self, label_id: &str) -> bool {
        self.label_ids().contains(&label_id)
    }

    pub fn rank(&self) -> Option<f64> {
        self.fields.get(fields::RANK).and_then(Value::as_f64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Keep only the named fields.
    pub fn retain_fields<'a>(&self, keep: impl IntoIterator<Item = &'a str>) -> TaskDocument {
        let fields = keep
            .into_iter()
            .filter_map(|key| self.fields.get(key).map(|v| (key.to_string(), v.clone())))
            .collect();
        TaskDocument { fields }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// A label: identifier plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl Label {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Find a label by display name, ignoring case.
    pub fn find_by_name<'a>(labels: &'a [Label], name: &str) -> Option<&'a Label> {
        let wanted = name.to_lowercase();
        labels.iter().find(|label| label.title.to_lowercase() == wanted)
    }
}

//! Write payloads: new tasks and projects, document setters, batch outcomes

use super::entities::fields;
use crate::core::date::format_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Container type used when a project is created without one
pub const DEFAULT_PROJECT_TYPE: &str = "project";

/// A task to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    /// Project the task belongs to
    pub parent_id: Option<String>,
    pub category_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Container the created task must end up in: the project if given,
    /// otherwise the category.
    pub fn target_parent(&self) -> Option<&str> {
        self.parent_id.as_deref().or(self.category_id.as_deref())
    }

    /// Request body for the add-task endpoint
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(fields::TITLE.to_string(), json!(self.title));
        if let Some(parent_id) = &self.parent_id {
            body.insert(fields::PARENT_ID.to_string(), json!(parent_id));
        }
        if let Some(category_id) = &self.category_id {
            body.insert("categoryId".to_string(), json!(category_id));
        }
        if let Some(due_date) = self.due_date {
            body.insert(fields::DUE_DATE.to_string(), json!(format_date(due_date)));
        }
        if let Some(note) = &self.note {
            body.insert(fields::NOTE.to_string(), json!(note));
        }
        Value::Object(body)
    }
}

/// A project (or other container type) to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub project_type: String,
}

impl NewProject {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            project_type: DEFAULT_PROJECT_TYPE.to_string(),
        }
    }

    pub fn with_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = project_type.into();
        self
    }

    pub fn to_body(&self) -> Value {
        json!({ "title": self.title, "type": self.project_type })
    }
}

/// One field assignment in a document update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSetter {
    pub key: String,
    pub val: Value,
}

impl DocSetter {
    pub fn new(key: impl Into<String>, val: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            val: val.into(),
        }
    }
}

/// One item of a batch that the service rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// Task id or title, whichever the caller supplied
    pub item: String,
    pub error: String,
}

/// Result of a batch write: successes and failures never abort each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub tasks: Vec<Value>,
    pub failed_tasks: Vec<BatchFailure>,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_requested: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Upstream calls issued, including parent corrections
    #[serde(skip)]
    pub api_calls_made: usize,
}

impl BatchOutcome {
    pub fn new(total_requested: usize) -> Self {
        Self {
            total_requested,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, task: Value) {
        self.tasks.push(task);
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, item: impl Into<String>, error: impl ToString) {
        self.failed_tasks.push(BatchFailure {
            item: item.into(),
            error: error.to_string(),
        });
        self.failure_count += 1;
    }
}

/// A new project and the tasks created inside it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWithTasks {
    pub created_project: Value,
    #[serde(flatten)]
    pub tasks: BatchOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_body_uses_service_field_names() {
        let task = NewTask::new("Write report")
            .with_parent("p1")
            .with_category("c1")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap())
            .with_note("draft first");

        assert_eq!(
            task.to_body(),
            json!({
                "title": "Write report",
                "parentId": "p1",
                "categoryId": "c1",
                "dueDate": "2025-06-20",
                "note": "draft first"
            })
        );
        assert_eq!(task.target_parent(), Some("p1"));
    }

    #[test]
    fn test_minimal_task_body() {
        let task = NewTask::new("Call back").with_category("c1");
        assert_eq!(task.to_body(), json!({"title": "Call back", "categoryId": "c1"}));
        assert_eq!(task.target_parent(), Some("c1"));
        assert_eq!(NewTask::new("x").target_parent(), None);
    }

    #[test]
    fn test_project_body_defaults_type() {
        assert_eq!(
            NewProject::new("Garden").to_body(),
            json!({"title": "Garden", "type": "project"})
        );
        assert_eq!(NewProject::new("Home").with_type("category").project_type, "category");
    }

    #[test]
    fn test_setters_deserialize() {
        let setters: Vec<DocSetter> =
            serde_json::from_value(json!([{"key": "dueDate", "val": ""}, {"key": "isStarred", "val": 1}]))
                .unwrap();
        assert_eq!(setters[0], DocSetter::new("dueDate", ""));
        assert_eq!(setters[1].val, json!(1));
    }

    #[test]
    fn test_batch_outcome_counts() {
        let mut outcome = BatchOutcome::new(3);
        outcome.record_success(json!({"_id": "a"}));
        outcome.record_failure("b", "HTTP 500");
        outcome.record_success(json!({"_id": "c"}));

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 1);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["failed_tasks"][0], json!({"item": "b", "error": "HTTP 500"}));
        assert!(value.get("warnings").is_none());
        assert!(value.get("api_calls_made").is_none());
    }
}

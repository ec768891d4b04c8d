//! Hand-written port mocks shared by the use case tests.

use crate::ports::document_store::{DocumentStorePort, StoreError};
use crate::ports::task_service::{ServiceError, TaskServicePort, endpoints};
use crate::ports::task_writer::TaskWriterPort;
use async_trait::async_trait;
use chrono::NaiveDate;
use marvin_domain::{DocSetter, Label, NewProject, NewTask, Selector, TaskDocument, format_date};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) fn docs(value: serde_json::Value) -> Vec<TaskDocument> {
    TaskDocument::from_array(value)
}

pub(crate) fn date(s: &str) -> NaiveDate {
    marvin_domain::parse_date(s).unwrap()
}

pub(crate) fn http_500(endpoint: &str) -> ServiceError {
    ServiceError::Http {
        endpoint: endpoint.to_string(),
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

/// Task service backed by fixed data; records every call path.
#[derive(Default)]
pub(crate) struct MockTaskService {
    categories: Vec<TaskDocument>,
    labels: Vec<Label>,
    children: HashMap<String, Result<Vec<TaskDocument>, ServiceError>>,
    today: HashMap<Option<NaiveDate>, Vec<TaskDocument>>,
    due: Vec<TaskDocument>,
    done: HashMap<Option<NaiveDate>, Result<Vec<TaskDocument>, ServiceError>>,
    honour_parent: bool,
    no_full_access: bool,
    anonymous_projects: bool,
    create_failures: HashMap<String, ServiceError>,
    mark_done_failures: HashMap<String, ServiceError>,
    created: Mutex<usize>,
    updates: Mutex<Vec<(String, Vec<DocSetter>)>>,
    calls: Mutex<Vec<String>>,
}

impl MockTaskService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_categories(mut self, value: serde_json::Value) -> Self {
        self.categories = docs(value);
        self
    }

    pub(crate) fn with_label(mut self, id: &str, title: &str) -> Self {
        self.labels.push(Label::new(id, title));
        self
    }

    pub(crate) fn with_children(mut self, parent: &str, value: serde_json::Value) -> Self {
        self.children.insert(parent.to_string(), Ok(docs(value)));
        self
    }

    pub(crate) fn with_children_error(mut self, parent: &str, error: ServiceError) -> Self {
        self.children.insert(parent.to_string(), Err(error));
        self
    }

    pub(crate) fn with_today(mut self, day: Option<NaiveDate>, value: serde_json::Value) -> Self {
        self.today.insert(day, docs(value));
        self
    }

    pub(crate) fn with_due(mut self, value: serde_json::Value) -> Self {
        self.due = docs(value);
        self
    }

    pub(crate) fn with_done(mut self, day: Option<NaiveDate>, value: serde_json::Value) -> Self {
        self.done.insert(day, Ok(docs(value)));
        self
    }

    pub(crate) fn with_done_error(mut self, day: Option<NaiveDate>, error: ServiceError) -> Self {
        self.done.insert(day, Err(error));
        self
    }

    /// Created tasks carry the requested parent, like a well-behaved service
    pub(crate) fn honouring_parent(mut self) -> Self {
        self.honour_parent = true;
        self
    }

    /// Document endpoints fail as if no full-access token were configured
    pub(crate) fn without_full_access(mut self) -> Self {
        self.no_full_access = true;
        self
    }

    pub(crate) fn with_anonymous_projects(mut self) -> Self {
        self.anonymous_projects = true;
        self
    }

    pub(crate) fn failing_create(mut self, title: &str, error: ServiceError) -> Self {
        self.create_failures.insert(title.to_string(), error);
        self
    }

    pub(crate) fn failing_mark_done(mut self, item_id: &str, error: ServiceError) -> Self {
        self.mark_done_failures.insert(item_id.to_string(), error);
        self
    }

    pub(crate) fn updates(&self) -> Vec<(String, Vec<DocSetter>)> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(endpoint)).count()
    }

    fn record(&self, path: String) {
        self.calls.lock().unwrap().push(path);
    }

    fn require_full_access(&self, endpoint: &str) -> Result<(), ServiceError> {
        if self.no_full_access {
            return Err(ServiceError::FullAccessRequired {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(())
    }
}

fn with_date(endpoint: &str, day: Option<NaiveDate>) -> String {
    match day {
        Some(day) => format!("{}?date={}", endpoint, format_date(day)),
        None => endpoint.to_string(),
    }
}

#[async_trait]
impl TaskServicePort for MockTaskService {
    async fn categories(&self) -> Result<Vec<TaskDocument>, ServiceError> {
        self.record(endpoints::CATEGORIES.to_string());
        Ok(self.categories.clone())
    }

    async fn labels(&self) -> Result<Vec<Label>, ServiceError> {
        self.record(endpoints::LABELS.to_string());
        Ok(self.labels.clone())
    }

    async fn children(&self, parent_id: &str) -> Result<Vec<TaskDocument>, ServiceError> {
        self.record(format!("{}?parentId={}", endpoints::CHILDREN, parent_id));
        self.children
            .get(parent_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(ServiceError::NotFound {
                    endpoint: endpoints::CHILDREN.to_string(),
                })
            })
    }

    async fn today_items(&self, day: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError> {
        self.record(with_date(endpoints::TODAY_ITEMS, day));
        Ok(self.today.get(&day).cloned().unwrap_or_default())
    }

    async fn due_items(&self) -> Result<Vec<TaskDocument>, ServiceError> {
        self.record(endpoints::DUE_ITEMS.to_string());
        Ok(self.due.clone())
    }

    async fn done_items(&self, day: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError> {
        self.record(with_date(endpoints::DONE_ITEMS, day));
        self.done.get(&day).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn goals(&self) -> Result<Vec<Value>, ServiceError> {
        self.record(endpoints::GOALS.to_string());
        Ok(vec![json!({"_id": "g1", "title": "Run a marathon"})])
    }

    async fn account(&self) -> Result<Value, ServiceError> {
        self.record(endpoints::ME.to_string());
        Ok(json!({"email": "me@example.com"}))
    }

    async fn test_connection(&self) -> Result<String, ServiceError> {
        self.record(endpoints::TEST.to_string());
        Ok("OK".to_string())
    }
}

#[async_trait]
impl TaskWriterPort for MockTaskService {
    async fn create_task(&self, task: &NewTask) -> Result<Value, ServiceError> {
        self.record(endpoints::ADD_TASK.to_string());
        if let Some(error) = self.create_failures.get(&task.title) {
            return Err(error.clone());
        }
        let mut created = self.created.lock().unwrap();
        *created += 1;
        let mut document = json!({"_id": format!("task-{}", *created), "title": task.title});
        if self.honour_parent
            && let Some(parent) = task.target_parent()
        {
            document["parentId"] = json!(parent);
        }
        Ok(document)
    }

    async fn mark_done(&self, item_id: &str, timezone_offset: i64) -> Result<Value, ServiceError> {
        self.record(endpoints::MARK_DONE.to_string());
        match self.mark_done_failures.get(item_id) {
            Some(error) => Err(error.clone()),
            None => Ok(json!({"_id": item_id, "done": true, "timeZoneOffset": timezone_offset})),
        }
    }

    async fn create_project(&self, project: &NewProject) -> Result<Value, ServiceError> {
        self.record(endpoints::ADD_PROJECT.to_string());
        if self.anonymous_projects {
            return Ok(json!({"title": project.title}));
        }
        Ok(json!({"_id": "project-1", "title": project.title, "type": project.project_type}))
    }

    async fn read_doc(&self, item_id: &str) -> Result<Value, ServiceError> {
        self.record(format!("{}?id={}", endpoints::DOC, item_id));
        self.require_full_access(endpoints::DOC)?;
        Ok(json!({"_id": item_id}))
    }

    async fn update_doc(&self, item_id: &str, setters: &[DocSetter]) -> Result<Value, ServiceError> {
        self.record(format!("{}?itemId={}", endpoints::DOC_UPDATE, item_id));
        self.require_full_access(endpoints::DOC_UPDATE)?;
        self.updates
            .lock()
            .unwrap()
            .push((item_id.to_string(), setters.to_vec()));
        Ok(json!({"_id": item_id}))
    }

    async fn create_doc(&self, document: &Value) -> Result<Value, ServiceError> {
        self.record(endpoints::DOC_CREATE.to_string());
        self.require_full_access(endpoints::DOC_CREATE)?;
        Ok(document.clone())
    }

    async fn delete_doc(&self, item_id: &str) -> Result<Value, ServiceError> {
        self.record(format!("{}?itemId={}", endpoints::DOC_DELETE, item_id));
        self.require_full_access(endpoints::DOC_DELETE)?;
        Ok(json!({}))
    }
}

/// Document store returning fixed documents; records each query.
#[derive(Default)]
pub(crate) struct MockDocumentStore {
    documents: Vec<TaskDocument>,
    failure: Option<StoreError>,
    queries: Mutex<Vec<(Selector, Option<Vec<String>>, usize)>>,
}

impl MockDocumentStore {
    pub(crate) fn new(value: serde_json::Value) -> Self {
        Self {
            documents: docs(value),
            ..Default::default()
        }
    }

    pub(crate) fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub(crate) fn queries(&self) -> Vec<(Selector, Option<Vec<String>>, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStorePort for MockDocumentStore {
    async fn find(
        &self,
        selector: &Selector,
        fields: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<TaskDocument>, StoreError> {
        self.queries
            .lock()
            .unwrap()
            .push((selector.clone(), fields.map(<[String]>::to_vec), limit));
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.documents.clone()),
        }
    }
}

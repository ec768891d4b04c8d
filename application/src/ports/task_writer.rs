//! Task writer port
//!
//! Changes to the task-management service: task and project creation,
//! completion, and raw document access. The document methods need the
//! full-access token; without it they fail with
//! [`ServiceError::FullAccessRequired`] before any request is sent.

use crate::ports::task_service::ServiceError;
use async_trait::async_trait;
use marvin_domain::{DocSetter, NewProject, NewTask};
use serde_json::Value;

#[async_trait]
pub trait TaskWriterPort: Send + Sync {
    /// Create one task; returns the created document
    async fn create_task(&self, task: &NewTask) -> Result<Value, ServiceError>;

    /// Mark an item done. `timezone_offset` is minutes from UTC.
    async fn mark_done(&self, item_id: &str, timezone_offset: i64) -> Result<Value, ServiceError>;

    async fn create_project(&self, project: &NewProject) -> Result<Value, ServiceError>;

    async fn read_doc(&self, item_id: &str) -> Result<Value, ServiceError>;

    async fn update_doc(&self, item_id: &str, setters: &[DocSetter]) -> Result<Value, ServiceError>;

    async fn create_doc(&self, document: &Value) -> Result<Value, ServiceError>;

    async fn delete_doc(&self, item_id: &str) -> Result<Value, ServiceError>;
}

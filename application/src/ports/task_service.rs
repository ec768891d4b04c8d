//! Task service port
//!
//! Read access to the task-management service's REST API. Every error
//! carries the endpoint that was being attempted.

use async_trait::async_trait;
use chrono::NaiveDate;
use marvin_domain::{DocumentKind, Label, TaskDocument};
use serde_json::Value;
use thiserror::Error;

/// REST endpoint paths, as reported to callers
pub mod endpoints {
    pub const CATEGORIES: &str = "/categories";
    pub const LABELS: &str = "/labels";
    pub const CHILDREN: &str = "/children";
    pub const TODAY_ITEMS: &str = "/todayItems";
    pub const DUE_ITEMS: &str = "/dueItems";
    pub const DONE_ITEMS: &str = "/doneItems";
    pub const GOALS: &str = "/goals";
    pub const ME: &str = "/me";
    pub const TEST: &str = "/test";
    pub const ADD_TASK: &str = "/addTask";
    pub const MARK_DONE: &str = "/markDone";
    pub const ADD_PROJECT: &str = "/addProject";
    pub const DOC: &str = "/doc";
    pub const DOC_CREATE: &str = "/doc/create";
    pub const DOC_UPDATE: &str = "/doc/update";
    pub const DOC_DELETE: &str = "/doc/delete";
}

/// Environment variable that supplies the full-access token
pub const FULL_ACCESS_TOKEN_ENV: &str = "AMAZING_MARVIN_FULL_ACCESS_TOKEN";

/// Errors from the task service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{endpoint} returned 404 Not Found")]
    NotFound { endpoint: String },

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Http {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{endpoint} needs a full-access token; set {}", FULL_ACCESS_TOKEN_ENV)]
    FullAccessRequired { endpoint: String },
}

impl ServiceError {
    /// The endpoint that was being attempted
    pub fn endpoint(&self) -> &str {
        match self {
            ServiceError::NotFound { endpoint }
            | ServiceError::Http { endpoint, .. }
            | ServiceError::Transport { endpoint, .. }
            | ServiceError::Decode { endpoint, .. }
            | ServiceError::FullAccessRequired { endpoint } => endpoint,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }
}

/// Port for the task service's read endpoints
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TaskServicePort: Send + Sync {
    /// All categories and projects
    async fn categories(&self) -> Result<Vec<TaskDocument>, ServiceError>;

    async fn labels(&self) -> Result<Vec<Label>, ServiceError>;

    /// Direct children of a container or parent task.
    ///
    /// Fails with [`ServiceError::NotFound`] for container types that do not
    /// support the children endpoint.
    async fn children(&self, parent_id: &str) -> Result<Vec<TaskDocument>, ServiceError>;

    /// Items scheduled for `date` (today when `None`)
    async fn today_items(&self, date: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError>;

    /// Due and overdue items
    async fn due_items(&self) -> Result<Vec<TaskDocument>, ServiceError>;

    /// Items completed on `date` (today when `None`)
    async fn done_items(&self, date: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError>;

    async fn goals(&self) -> Result<Vec<Value>, ServiceError>;

    /// Account profile of the token's owner
    async fn account(&self) -> Result<Value, ServiceError>;

    /// Credential check; the service answers with a short status text
    async fn test_connection(&self) -> Result<String, ServiceError>;

    /// Categories whose type is `project`
    async fn projects(&self) -> Result<Vec<TaskDocument>, ServiceError> {
        let categories = self.categories().await?;
        Ok(categories
            .into_iter()
            .filter(|c| c.kind() == DocumentKind::Project)
            .collect())
    }
}

//! Aggregation result value objects

use super::outcome::SkippedContainer;
use crate::document::TaskDocument;
use crate::query::normalize::Normalized;
use serde::{Deserialize, Serialize};

/// Which access path served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySource {
    /// Recursive walk of the category/project tree over the REST API
    TreeTraversal,
    /// Single `_find` query against the document store
    DocumentStore,
}

impl QuerySource {
    /// Endpoint description used in summaries and error reports
    pub fn endpoint(&self) -> &str {
        match self {
            QuerySource::TreeTraversal => "/categories + /children",
            QuerySource::DocumentStore => "CouchDB _find",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuerySource::TreeTraversal => "tree_traversal",
            QuerySource::DocumentStore => "document_store",
        }
    }
}

impl std::fmt::Display for QuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized task list shared by both access paths.
///
/// Callers cannot tell which path produced it except through [`source`](Self::source).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub tasks: Vec<TaskDocument>,
    pub total_tasks: usize,
    /// Upstream calls made to produce this result
    pub api_calls_made: usize,
    pub source: QuerySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_returned: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_filter: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    /// Containers whose children could not be fetched (traversal only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_containers: Vec<SkippedContainer>,
    pub summary: String,
}

impl AggregationResult {
    pub fn new(source: QuerySource, normalized: Normalized, api_calls_made: usize) -> Self {
        let total_tasks = normalized.tasks.len();
        Self {
            tasks: normalized.tasks,
            total_tasks,
            api_calls_made,
            source,
            fields_returned: normalized.fields_returned,
            label_filter: None,
            filters: Vec::new(),
            skipped_containers: Vec::new(),
            summary: format!("Retrieved {} tasks", total_tasks),
        }
    }

    /// Empty result for a label name that resolved to nothing.
    pub fn label_not_found(source: QuerySource, label: &str, api_calls_made: usize) -> Self {
        Self {
            tasks: Vec::new(),
            total_tasks: 0,
            api_calls_made,
            source,
            fields_returned: None,
            label_filter: Some(label.to_string()),
            filters: Vec::new(),
            skipped_containers: Vec::new(),
            summary: format!("No label found matching '{}'", label),
        }
    }

    pub fn with_label_filter(mut self, label: Option<&str>) -> Self {
        self.label_filter = label.map(str::to_string);
        self
    }

    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedContainer>) -> Self {
        self.skipped_containers = skipped;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sorted identifiers of the returned tasks
    pub fn task_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tasks.iter().filter_map(|t| t.id()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped_containers.is_empty()
    }
}

/// Children of one parent, direct or recursive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildrenResult {
    pub parent_id: String,
    pub recursive: bool,
    pub tasks: Vec<TaskDocument>,
    /// Sub-container documents (projects and categories)
    pub projects: Vec<TaskDocument>,
    pub task_count: usize,
    pub project_count: usize,
    pub total_children: usize,
    pub api_calls_made: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_containers: Vec<SkippedContainer>,
}

impl ChildrenResult {
    pub fn new(
        parent_id: impl Into<String>,
        recursive: bool,
        tasks: Vec<TaskDocument>,
        projects: Vec<TaskDocument>,
        api_calls_made: usize,
    ) -> Self {
        let task_count = tasks.len();
        let project_count = projects.len();
        Self {
            parent_id: parent_id.into(),
            recursive,
            tasks,
            projects,
            task_count,
            project_count,
            total_children: task_count + project_count,
            api_calls_made,
            skipped_containers: Vec::new(),
        }
    }

    /// Split direct children into tasks and sub-containers.
    pub fn from_direct_children(parent_id: impl Into<String>, children: Vec<TaskDocument>) -> Self {
        let (projects, tasks): (Vec<_>, Vec<_>) =
            children.into_iter().partition(TaskDocument::is_container);
        Self::new(parent_id, false, tasks, projects, 1)
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedContainer>) -> Self {
        self.skipped_containers = skipped;
        self
    }
}

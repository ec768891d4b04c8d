//! Aggregate Tasks use case
//!
//! The traversal path: walks the category/project tree over the REST API and
//! flattens it into a de-duplicated task list.
//!
//! Each level of the tree is fetched with bounded fan-out. Only this
//! coordinator touches the [`Traversal`] state; fetches return a
//! [`SubtreeOutcome`] that is absorbed in completion order.

use crate::config::AggregationSettings;
use crate::ports::task_service::{ServiceError, TaskServicePort};
use crate::use_cases::shared::resolve_label;
use futures::stream::{self, StreamExt};
use marvin_domain::{
    AggregationResult, ChildrenResult, FieldProjection, LabelResolution, QuerySource,
    SubtreeOutcome, TaskDocument, Traversal, TraversalOutput, normalize_documents,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an aggregation
///
/// Failures of individual subtrees are absorbed and never surface here.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AggregateError {
    pub fn endpoint(&self) -> &str {
        match self {
            AggregateError::Service(e) => e.endpoint(),
        }
    }
}

/// A finished walk plus the calls spent on it.
#[derive(Debug)]
pub(crate) struct TraversalRun {
    pub label: LabelResolution,
    pub output: TraversalOutput,
    pub api_calls: usize,
}

/// Use case for the tree traversal path
pub struct AggregateTasksUseCase<S: TaskServicePort + 'static> {
    service: Arc<S>,
    settings: AggregationSettings,
}

impl<S: TaskServicePort + 'static> AggregateTasksUseCase<S> {
    pub fn new(service: Arc<S>, settings: AggregationSettings) -> Self {
        Self { service, settings }
    }

    /// Flatten every task below `roots`, optionally keeping only tasks with `label`.
    ///
    /// An unknown label short-circuits with an empty result before any
    /// children are fetched.
    pub async fn aggregate_all_tasks(
        &self,
        roots: &[TaskDocument],
        label: Option<&str>,
    ) -> Result<AggregationResult, AggregateError> {
        let run = self.walk(roots, label).await?;
        Ok(self.finish(run, label, None, 0))
    }

    /// All tasks across the whole forest: one `/categories` call, then the walk.
    pub async fn get_all_tasks(
        &self,
        label: Option<&str>,
        fields: Option<&FieldProjection>,
    ) -> Result<AggregationResult, AggregateError> {
        let roots = self.service.categories().await?;
        info!(roots = roots.len(), "Aggregating tasks across all containers");
        let run = self.walk(&roots, label).await?;
        Ok(self.finish(run, label, fields, 1))
    }

    /// Flatten the subtree below one parent.
    pub async fn children_recursive(&self, parent_id: &str) -> ChildrenResult {
        let mut traversal = Traversal::new(None);
        traversal.enqueue(parent_id);
        self.drive(&mut traversal, vec![parent_id.to_string()]).await;
        let output = traversal.finish();

        info!(
            parent_id,
            tasks = output.tasks.len(),
            fetches = output.fetches,
            "Collected subtree"
        );
        ChildrenResult::new(
            parent_id,
            true,
            output.tasks,
            output.containers,
            output.fetches,
        )
        .with_skipped(output.skipped)
    }

    /// Direct children of one parent, split into tasks and sub-containers.
    ///
    /// A not-found response means the parent has no children endpoint and
    /// yields an empty result.
    pub async fn direct_children(&self, parent_id: &str) -> Result<ChildrenResult, AggregateError> {
        let children = match self.service.children(parent_id).await {
            Ok(children) => children,
            Err(e) if e.is_not_found() => {
                debug!(parent_id, "Children endpoint not available for parent");
                Vec::new()
            }
            Err(e) => {
                warn!(parent_id, endpoint = e.endpoint(), error = %e, "Failed to fetch children");
                return Err(e.into());
            }
        };
        Ok(ChildrenResult::from_direct_children(parent_id, children))
    }

    /// Resolve the label, then walk the forest below `roots`.
    ///
    /// Calls spent on label resolution are included in the run.
    pub(crate) async fn walk(
        &self,
        roots: &[TaskDocument],
        label: Option<&str>,
    ) -> Result<TraversalRun, ServiceError> {
        let (resolution, label_calls) = resolve_label(self.service.as_ref(), label).await?;
        if let LabelResolution::NotFound(name) = &resolution {
            info!(label = %name, "Label not found, skipping traversal");
            return Ok(TraversalRun {
                label: resolution,
                output: TraversalOutput::default(),
                api_calls: label_calls,
            });
        }

        let mut traversal = Traversal::new(resolution.label_id().map(str::to_string));
        let frontier = traversal.enqueue_roots(roots);
        self.drive(&mut traversal, frontier).await;
        let output = traversal.finish();

        Ok(TraversalRun {
            label: resolution,
            api_calls: label_calls + output.fetches,
            output,
        })
    }

    /// Fetch level by level until no unvisited containers remain.
    async fn drive(&self, traversal: &mut Traversal, mut frontier: Vec<String>) {
        let limit = self.settings.concurrency();
        while !frontier.is_empty() {
            let level = std::mem::take(&mut frontier);
            debug!(containers = level.len(), "Fetching traversal level");

            let mut outcomes = stream::iter(level)
                .map(|container_id| self.fetch_subtree(container_id))
                .buffer_unordered(limit);

            while let Some(outcome) = outcomes.next().await {
                frontier.extend(traversal.absorb(outcome));
            }
        }
    }

    async fn fetch_subtree(&self, container_id: String) -> SubtreeOutcome {
        match self.service.children(&container_id).await {
            Ok(children) => SubtreeOutcome::fetched(container_id, children),
            Err(e) if e.is_not_found() => {
                debug!(container_id = %container_id, "Container has no children endpoint");
                SubtreeOutcome::fetched(container_id, Vec::new())
            }
            Err(e) => {
                warn!(
                    container_id = %container_id,
                    endpoint = e.endpoint(),
                    error = %e,
                    "Skipping subtree after failed children fetch"
                );
                SubtreeOutcome::absorbed(container_id, e.to_string())
            }
        }
    }

    fn finish(
        &self,
        run: TraversalRun,
        label: Option<&str>,
        fields: Option<&FieldProjection>,
        extra_calls: usize,
    ) -> AggregationResult {
        let api_calls = run.api_calls + extra_calls;
        if let LabelResolution::NotFound(name) = &run.label {
            return AggregationResult::label_not_found(QuerySource::TreeTraversal, name, api_calls);
        }

        let skipped = run.output.skipped;
        let normalized = normalize_documents(run.output.tasks, fields);
        let total = normalized.tasks.len();

        let mut summary = format!("Retrieved {} tasks across all projects", total);
        if let Some(label) = label {
            summary.push_str(&format!(" with label '{}'", label));
        }
        if !skipped.is_empty() {
            summary.push_str(&format!(" ({} containers skipped)", skipped.len()));
        }

        info!(tasks = total, api_calls, "Traversal complete");
        AggregationResult::new(QuerySource::TreeTraversal, normalized, api_calls)
            .with_label_filter(label)
            .with_skipped(skipped)
            .with_summary(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{MockTaskService, docs, http_500};
    use serde_json::json;

    fn use_case(service: MockTaskService) -> (Arc<MockTaskService>, AggregateTasksUseCase<MockTaskService>) {
        let service = Arc::new(service);
        let use_case = AggregateTasksUseCase::new(Arc::clone(&service), AggregationSettings::default());
        (service, use_case)
    }

    fn root() -> Vec<TaskDocument> {
        docs(json!([{"_id": "root", "title": "Root", "type": "category"}]))
    }

    fn root_tree() -> MockTaskService {
        MockTaskService::new()
            .with_children(
                "root",
                json!([
                    {"_id": "task-a", "title": "TaskA", "parentId": "root"},
                    {"_id": "proj-p", "title": "ProjectP", "type": "project", "parentId": "root"}
                ]),
            )
            .with_children(
                "proj-p",
                json!([
                    {"_id": "task-b", "title": "TaskB", "parentId": "proj-p"},
                    {"_id": "task-c", "title": "TaskC", "parentId": "proj-p"}
                ]),
            )
    }

    #[tokio::test]
    async fn test_root_project_scenario() {
        let (service, use_case) = use_case(root_tree());

        let result = use_case.aggregate_all_tasks(&root(), None).await.unwrap();

        assert_eq!(result.task_ids(), vec!["task-a", "task-b", "task-c"]);
        assert_eq!(result.total_tasks, 3);
        assert_eq!(result.api_calls_made, 2);
        assert_eq!(result.source, QuerySource::TreeTraversal);
        assert_eq!(service.calls_to("/children"), 2);
        assert!(result.tasks.iter().all(|t| !t.is_container()));
    }

    #[tokio::test]
    async fn test_self_cycle_terminates() {
        let service = MockTaskService::new().with_children(
            "a",
            json!([
                {"_id": "a", "type": "project"},
                {"_id": "t1"},
                {"_id": "t2"}
            ]),
        );
        let (service, use_case) = use_case(service);
        let roots = docs(json!([{"_id": "a", "type": "project"}]));

        let result = use_case.aggregate_all_tasks(&roots, None).await.unwrap();

        assert_eq!(result.task_ids(), vec!["t1", "t2"]);
        assert_eq!(service.calls_to("/children"), 1);
    }

    #[tokio::test]
    async fn test_mutual_cycle_terminates() {
        let service = MockTaskService::new()
            .with_children("a", json!([{"_id": "b", "type": "category"}, {"_id": "t1"}]))
            .with_children("b", json!([{"_id": "a", "type": "project"}, {"_id": "t1"}]));
        let (service, use_case) = use_case(service);
        let roots = docs(json!([{"_id": "a", "type": "project"}, {"_id": "b", "type": "category"}]));

        let result = use_case.aggregate_all_tasks(&roots, None).await.unwrap();

        assert_eq!(result.task_ids(), vec!["t1"]);
        assert_eq!(service.calls_to("/children"), 2);
    }

    #[tokio::test]
    async fn test_failed_subtree_is_absorbed() {
        let service = root_tree().with_children_error("proj-p", http_500("/children"));
        let (_, use_case) = use_case(service);

        let result = use_case.aggregate_all_tasks(&root(), None).await.unwrap();

        assert_eq!(result.task_ids(), vec!["task-a"]);
        assert_eq!(result.api_calls_made, 2);
        assert!(result.is_partial());
        assert_eq!(result.skipped_containers[0].container_id, "proj-p");
        assert!(result.summary.contains("1 containers skipped"));
    }

    #[tokio::test]
    async fn test_not_found_is_treated_as_empty() {
        // "proj-p" has no registered children, so the mock answers 404
        let service = MockTaskService::new().with_children(
            "root",
            json!([{"_id": "task-a"}, {"_id": "proj-p", "type": "project"}]),
        );
        let (_, use_case) = use_case(service);

        let result = use_case.aggregate_all_tasks(&root(), None).await.unwrap();

        assert_eq!(result.task_ids(), vec!["task-a"]);
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_label_filter_applied_during_walk() {
        let service = MockTaskService::new()
            .with_label("l-urgent", "Urgent")
            .with_children(
                "root",
                json!([
                    {"_id": "t1", "labelIds": ["l-urgent"]},
                    {"_id": "t2", "labelIds": []},
                    {"_id": "t3"}
                ]),
            );
        let (service, use_case) = use_case(service);

        let result = use_case.aggregate_all_tasks(&root(), Some("urgent")).await.unwrap();

        assert_eq!(result.task_ids(), vec!["t1"]);
        assert_eq!(result.label_filter.as_deref(), Some("urgent"));
        assert_eq!(result.api_calls_made, 2);
        assert_eq!(service.calls_to("/labels"), 1);
    }

    #[tokio::test]
    async fn test_unknown_label_short_circuits() {
        let (service, use_case) = use_case(root_tree().with_label("l1", "Home"));

        let result = use_case.aggregate_all_tasks(&root(), Some("Work")).await.unwrap();

        assert!(result.tasks.is_empty());
        assert_eq!(result.summary, "No label found matching 'Work'");
        assert_eq!(result.api_calls_made, 1);
        assert_eq!(service.calls_to("/children"), 0);
    }

    #[tokio::test]
    async fn test_get_all_tasks_projects_fields() {
        let service = root_tree().with_categories(json!([{"_id": "root", "type": "category"}]));
        let (_, use_case) = use_case(service);
        let fields = FieldProjection::from_requested(["title"]);

        let result = use_case.get_all_tasks(None, fields.as_ref()).await.unwrap();

        assert_eq!(result.total_tasks, 3);
        assert_eq!(result.api_calls_made, 3);
        assert_eq!(
            result.fields_returned,
            Some(vec!["_id".to_string(), "title".to_string()])
        );
        for task in &result.tasks {
            let mut names: Vec<&str> = task.field_names().collect();
            names.sort_unstable();
            assert_eq!(names, vec!["_id", "title"]);
        }
    }

    #[tokio::test]
    async fn test_idempotent_task_set() {
        let service = root_tree().with_categories(json!([{"_id": "root", "type": "category"}]));
        let (_, use_case) = use_case(service);

        let first = use_case.get_all_tasks(None, None).await.unwrap();
        let second = use_case.get_all_tasks(None, None).await.unwrap();

        assert_eq!(first.total_tasks, second.total_tasks);
        assert_eq!(first.task_ids(), second.task_ids());
    }

    #[tokio::test]
    async fn test_sequential_fan_out_gives_same_result() {
        let service = Arc::new(root_tree());
        let sequential = AggregateTasksUseCase::new(
            Arc::clone(&service),
            AggregationSettings::default().with_max_concurrency(1),
        );
        let result = sequential.aggregate_all_tasks(&root(), None).await.unwrap();
        assert_eq!(result.task_ids(), vec!["task-a", "task-b", "task-c"]);
    }

    #[tokio::test]
    async fn test_children_recursive() {
        let (_, use_case) = use_case(root_tree());

        let result = use_case.children_recursive("root").await;

        assert!(result.recursive);
        assert_eq!(result.task_count, 3);
        assert_eq!(result.project_count, 1);
        assert_eq!(result.projects[0].id(), Some("proj-p"));
        assert_eq!(result.api_calls_made, 2);
    }

    #[tokio::test]
    async fn test_direct_children() {
        let (service, use_case) = use_case(root_tree());

        let result = use_case.direct_children("root").await.unwrap();

        assert!(!result.recursive);
        assert_eq!(result.task_count, 1);
        assert_eq!(result.project_count, 1);
        assert_eq!(result.total_children, 2);
        assert_eq!(service.calls_to("/children"), 1);

        let missing = use_case.direct_children("nowhere").await.unwrap();
        assert_eq!(missing.total_children, 0);
    }

    #[tokio::test]
    async fn test_direct_children_surfaces_http_errors() {
        let service = MockTaskService::new().with_children_error("p", http_500("/children"));
        let (_, use_case) = use_case(service);

        let err = use_case.direct_children("p").await.unwrap_err();
        assert_eq!(err.endpoint(), "/children");
    }
}

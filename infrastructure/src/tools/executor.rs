//! Marvin tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`MarvinToolExecutor`] resolves a tool name (or alias), checks required
//! arguments, routes the call to a use case and wraps the outcome in a
//! [`ToolResult`] carrying the summary, endpoint, upstream call count and
//! duration.
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ resolve name / alias   → NOT_FOUND
//!   ├─ required arguments     → INVALID_ARGUMENT
//!   └─ dispatch()
//!        ├─ tasks::*          → TaskServicePort (one call)
//!        ├─ aggregation::*    → AggregateTasksUseCase / QueryTasksUseCase
//!        ├─ analytics::*      → AnalyticsUseCase
//!        ├─ account::*        → TaskServicePort (one call)
//!        ├─ writes::*         → WriteTasksUseCase
//!        └─ documents::*      → TaskWriterPort (full access)
//! ```

use super::{
    account, aggregation, analytics, default_tool_spec, documents, nominal_endpoint, tasks, writes,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use marvin_application::{
    AggregateError, AggregateTasksUseCase, AggregationSettings, AnalyticsError, AnalyticsUseCase,
    DocumentStorePort, FULL_ACCESS_TOKEN_ENV, QueryTasksError, QueryTasksUseCase, ServiceError,
    StoreCredentials, StoreError, TaskServicePort, TaskWriterPort, ToolExecutorPort,
    WriteTasksUseCase,
};
use marvin_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use marvin_domain::{DomainError, FieldProjection, format_date};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const FALLBACK_SUGGESTION: &str =
    "Use get_all_tasks, or find_tasks which falls back to tree traversal";

/// Successful outcome of one tool, before it is wrapped in a [`ToolResult`]
struct ToolOutput {
    data: Value,
    summary: String,
    endpoint: &'static str,
    api_calls: usize,
    item_count: Option<usize>,
}

impl ToolOutput {
    fn new(data: Value, summary: impl Into<String>, endpoint: &'static str, api_calls: usize) -> Self {
        Self {
            data,
            summary: summary.into(),
            endpoint,
            api_calls,
            item_count: None,
        }
    }

    fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = Some(count);
        self
    }
}

/// Conversion of use case and port errors into caller-facing [`ToolError`]s
trait IntoToolError {
    fn into_tool_error(self) -> ToolError;
}

impl IntoToolError for DomainError {
    fn into_tool_error(self) -> ToolError {
        ToolError::invalid_argument(self.to_string())
    }
}

impl IntoToolError for ServiceError {
    fn into_tool_error(self) -> ToolError {
        let error = match &self {
            ServiceError::NotFound { .. } => ToolError::new("NOT_FOUND", self.to_string()),
            ServiceError::Http { .. } => ToolError::upstream(self.to_string()),
            ServiceError::Transport { .. } | ServiceError::Decode { .. } => {
                ToolError::transport(self.to_string())
            }
            ServiceError::FullAccessRequired { .. } => ToolError::not_configured(self.to_string())
                .with_suggestion(format!(
                    "Set {} to a full-access token from the service's API settings",
                    FULL_ACCESS_TOKEN_ENV
                )),
        };
        error.with_endpoint(self.endpoint())
    }
}

impl IntoToolError for StoreError {
    fn into_tool_error(self) -> ToolError {
        let error = match &self {
            StoreError::NotConfigured { .. } => {
                ToolError::not_configured(self.to_string()).with_suggestion(FALLBACK_SUGGESTION)
            }
            StoreError::Http { .. } => ToolError::upstream(self.to_string()),
            StoreError::Transport(_) | StoreError::Decode(_) => ToolError::transport(self.to_string()),
        };
        error.with_endpoint(self.endpoint())
    }
}

impl IntoToolError for AggregateError {
    fn into_tool_error(self) -> ToolError {
        match self {
            AggregateError::Service(e) => e.into_tool_error(),
        }
    }
}

impl IntoToolError for AnalyticsError {
    fn into_tool_error(self) -> ToolError {
        match self {
            AnalyticsError::Domain(e) => e.into_tool_error(),
            AnalyticsError::Service(e) => e.into_tool_error(),
        }
    }
}

impl IntoToolError for QueryTasksError {
    fn into_tool_error(self) -> ToolError {
        match self {
            QueryTasksError::NotConfigured { .. } => {
                let endpoint = self.endpoint().to_string();
                ToolError::not_configured(self.to_string())
                    .with_endpoint(endpoint)
                    .with_suggestion(FALLBACK_SUGGESTION)
            }
            QueryTasksError::Store(e) => e.into_tool_error(),
            QueryTasksError::Service(e) => e.into_tool_error(),
            QueryTasksError::Domain(e) => e.into_tool_error(),
        }
    }
}

fn to_data<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::new("INTERNAL_ERROR", format!("Failed to encode result: {}", e)))
}

/// Executor that serves every registered tool from the task service and,
/// when configured, the document store.
pub struct MarvinToolExecutor<S, D>
where
    S: TaskServicePort + TaskWriterPort + 'static,
    D: DocumentStorePort + 'static,
{
    tool_spec: ToolSpec,
    service: Arc<S>,
    aggregate: AggregateTasksUseCase<S>,
    query: QueryTasksUseCase<S, D>,
    analytics: AnalyticsUseCase<S>,
    writes: WriteTasksUseCase<S>,
    /// Fixed "today" (None = local date at call time)
    today: Option<NaiveDate>,
}

impl<S, D> MarvinToolExecutor<S, D>
where
    S: TaskServicePort + TaskWriterPort + 'static,
    D: DocumentStorePort + 'static,
{
    pub fn new(
        service: Arc<S>,
        store: Arc<D>,
        credentials: StoreCredentials,
        settings: AggregationSettings,
    ) -> Self {
        Self {
            tool_spec: default_tool_spec(),
            aggregate: AggregateTasksUseCase::new(Arc::clone(&service), settings),
            query: QueryTasksUseCase::new(Arc::clone(&service), store, credentials, settings),
            analytics: AnalyticsUseCase::new(Arc::clone(&service), settings),
            writes: WriteTasksUseCase::new(Arc::clone(&service)),
            service,
            today: None,
        }
    }

    /// Pin the date treated as "today"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn check_required(call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        let missing: Vec<&str> = definition
            .required_parameters()
            .filter(|p| call.arguments.get(&p.name).is_none_or(Value::is_null))
            .map(|p| p.name.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ToolError::invalid_argument(format!(
                "Missing required argument: {}",
                missing.join(", ")
            )))
        }
    }

    async fn dispatch(&self, tool: &str, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        match tool {
            tasks::GET_TASKS => self.get_tasks(call).await,
            tasks::GET_PROJECTS => {
                let projects = self.service.projects().await.map_err(IntoToolError::into_tool_error)?;
                let count = projects.len();
                Ok(ToolOutput::new(
                    to_data(&projects)?,
                    format!("Retrieved {} projects", count),
                    tasks::PROJECTS_ENDPOINT,
                    1,
                )
                .with_item_count(count))
            }
            tasks::GET_CATEGORIES => {
                let categories = self.service.categories().await.map_err(IntoToolError::into_tool_error)?;
                let count = categories.len();
                Ok(ToolOutput::new(
                    to_data(&categories)?,
                    format!("Retrieved {} categories", count),
                    tasks::PROJECTS_ENDPOINT,
                    1,
                )
                .with_item_count(count))
            }
            tasks::GET_LABELS => {
                let labels = self.service.labels().await.map_err(IntoToolError::into_tool_error)?;
                let count = labels.len();
                Ok(ToolOutput::new(
                    json!({ "labels": labels }),
                    format!("Retrieved {} labels", count),
                    tasks::LABELS_ENDPOINT,
                    1,
                )
                .with_item_count(count))
            }
            tasks::GET_DUE_ITEMS => {
                let due = self.service.due_items().await.map_err(IntoToolError::into_tool_error)?;
                let count = due.len();
                Ok(ToolOutput::new(
                    json!({ "due_items": due }),
                    format!("Retrieved {} overdue/due items", count),
                    tasks::DUE_ENDPOINT,
                    1,
                )
                .with_item_count(count))
            }
            tasks::GET_CHILD_TASKS => self.get_child_tasks(call).await,
            aggregation::GET_ALL_TASKS => self.get_all_tasks(call).await,
            aggregation::QUERY_TASKS => {
                let filter = aggregation::task_filter(call).map_err(IntoToolError::into_tool_error)?;
                let result = self.query.execute(&filter).await.map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&result)?,
                    result.summary.clone(),
                    aggregation::QUERY_ENDPOINT,
                    result.api_calls_made,
                )
                .with_item_count(result.total_tasks))
            }
            aggregation::FIND_TASKS => {
                let filter = aggregation::task_filter(call).map_err(IntoToolError::into_tool_error)?;
                let result = self.query.find_tasks(&filter).await.map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&result)?,
                    result.summary.clone(),
                    aggregation::source_endpoint(result.source),
                    result.api_calls_made,
                )
                .with_item_count(result.total_tasks))
            }
            analytics::GET_COMPLETED_TASKS_FOR_DATE => {
                let date = call.require_date("date").map_err(IntoToolError::into_tool_error)?;
                let result = self
                    .analytics
                    .completed_for_date(date)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&result)?,
                    format!(
                        "Retrieved {} completed tasks for {}",
                        result.total_completed,
                        format_date(date)
                    ),
                    analytics::COMPLETED_ENDPOINT,
                    1,
                )
                .with_item_count(result.total_completed))
            }
            analytics::GET_COMPLETED_TASKS => {
                let summary = self
                    .analytics
                    .recent_completions(self.today())
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&summary)?,
                    format!(
                        "Retrieved {} completed tasks from past {} days",
                        summary.total_completed, summary.days_analyzed
                    ),
                    analytics::COMPLETED_ENDPOINT,
                    summary.api_calls_made,
                )
                .with_item_count(summary.total_completed))
            }
            analytics::GET_PRODUCTIVITY_SUMMARY => {
                let request = analytics::range_request(call).map_err(IntoToolError::into_tool_error)?;
                let summary = self
                    .analytics
                    .range_summary(request, self.today())
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&summary)?,
                    format!("Retrieved productivity summary for {} days", summary.days_analyzed),
                    analytics::COMPLETED_ENDPOINT,
                    summary.api_calls_made,
                )
                .with_item_count(summary.total_completed))
            }
            analytics::GET_DAILY_OVERVIEW => {
                let overview = self
                    .analytics
                    .daily_overview(self.today())
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&overview)?,
                    "Retrieved comprehensive daily productivity overview",
                    analytics::OVERVIEW_ENDPOINT,
                    3,
                ))
            }
            analytics::GET_PROJECT_OVERVIEW => {
                let project_id = call.require_string("project_id").map_err(IntoToolError::into_tool_error)?;
                let overview = self
                    .analytics
                    .project_overview(&project_id)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&overview)?,
                    format!("Retrieved overview for project {}", project_id),
                    analytics::PROJECT_ENDPOINT,
                    2,
                )
                .with_item_count(overview.task_count))
            }
            account::GET_GOALS => {
                let goals = self.service.goals().await.map_err(IntoToolError::into_tool_error)?;
                let count = goals.len();
                Ok(ToolOutput::new(
                    json!({ "goals": goals }),
                    format!("Retrieved {} goals", count),
                    account::GOALS_ENDPOINT,
                    1,
                )
                .with_item_count(count))
            }
            account::GET_ACCOUNT_INFO => {
                let account = self.service.account().await.map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    json!({ "account": account }),
                    "Retrieved account information",
                    account::ACCOUNT_ENDPOINT,
                    1,
                ))
            }
            account::TEST_API_CONNECTION => {
                let status = self
                    .service
                    .test_connection()
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    json!({ "status": status }),
                    format!("API connection test: {}", status),
                    account::TEST_ENDPOINT,
                    1,
                ))
            }
            writes::CREATE_TASK
            | writes::BATCH_CREATE_TASKS
            | writes::MARK_TASK_DONE
            | writes::BATCH_MARK_DONE
            | writes::CREATE_PROJECT
            | writes::CREATE_PROJECT_WITH_TASKS => self.dispatch_write(tool, call).await,
            documents::READ_DOC
            | documents::UPDATE_DOC
            | documents::CREATE_DOC
            | documents::DELETE_DOC => self.dispatch_document(tool, call).await,
            _ => Err(ToolError::new(
                "NOT_IMPLEMENTED",
                format!("Tool '{}' is not implemented", tool),
            )),
        }
    }

    async fn dispatch_write(&self, tool: &str, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        match tool {
            writes::CREATE_TASK => {
                let task = writes::new_task(call).map_err(IntoToolError::into_tool_error)?;
                let created = self
                    .writes
                    .create_task(&task)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                let mut data = json!({ "created_task": created.document });
                if let Some(warning) = &created.warning {
                    data["warning"] = json!(warning);
                }
                Ok(ToolOutput::new(
                    data,
                    format!("Created task: {}", task.title),
                    writes::CREATE_TASK_ENDPOINT,
                    created.api_calls,
                ))
            }
            writes::BATCH_CREATE_TASKS => {
                let (titles, template) = writes::batch_tasks(call).map_err(IntoToolError::into_tool_error)?;
                let outcome = self.writes.batch_create(&titles, &template).await;
                Ok(ToolOutput::new(
                    to_data(&outcome)?,
                    format!(
                        "Created {} of {} tasks in batch",
                        outcome.success_count, outcome.total_requested
                    ),
                    writes::CREATE_TASK_ENDPOINT,
                    outcome.api_calls_made,
                )
                .with_item_count(outcome.success_count))
            }
            writes::MARK_TASK_DONE => {
                let item_id = call.require_string("item_id").map_err(IntoToolError::into_tool_error)?;
                let offset = writes::timezone_offset(call).map_err(IntoToolError::into_tool_error)?;
                let completed = self
                    .writes
                    .mark_done(&item_id, offset)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    json!({ "completed_task": completed }),
                    format!("Marked task {} as completed", item_id),
                    writes::MARK_DONE_ENDPOINT,
                    1,
                ))
            }
            writes::BATCH_MARK_DONE => {
                let item_ids = writes::require_list(call, "task_ids").map_err(IntoToolError::into_tool_error)?;
                let offset = writes::timezone_offset(call).map_err(IntoToolError::into_tool_error)?;
                let outcome = self.writes.batch_mark_done(&item_ids, offset).await;
                Ok(ToolOutput::new(
                    to_data(&outcome)?,
                    format!(
                        "Marked {} of {} tasks as done",
                        outcome.success_count, outcome.total_requested
                    ),
                    writes::MARK_DONE_ENDPOINT,
                    outcome.api_calls_made,
                )
                .with_item_count(outcome.success_count))
            }
            writes::CREATE_PROJECT => {
                let project = writes::new_project(call, "title").map_err(IntoToolError::into_tool_error)?;
                let created = self
                    .writes
                    .create_project(&project)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    json!({ "created_project": created }),
                    format!("Created project: {}", project.title),
                    writes::CREATE_PROJECT_ENDPOINT,
                    1,
                ))
            }
            _ => {
                let project =
                    writes::new_project(call, "project_title").map_err(IntoToolError::into_tool_error)?;
                let titles = writes::require_list(call, "task_titles").map_err(IntoToolError::into_tool_error)?;
                let result = self
                    .writes
                    .create_project_with_tasks(&project, &titles)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                Ok(ToolOutput::new(
                    to_data(&result)?,
                    format!(
                        "Created project '{}' with {} of {} tasks",
                        project.title, result.tasks.success_count, result.tasks.total_requested
                    ),
                    writes::PROJECT_WITH_TASKS_ENDPOINT,
                    result.tasks.api_calls_made,
                )
                .with_item_count(result.tasks.success_count))
            }
        }
    }

    async fn dispatch_document(&self, tool: &str, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let (data, summary, endpoint) = match tool {
            documents::READ_DOC => {
                let item_id = call.require_string("item_id").map_err(IntoToolError::into_tool_error)?;
                let doc = self.service.read_doc(&item_id).await.map_err(IntoToolError::into_tool_error)?;
                (doc, format!("Read document {}", item_id), documents::READ_ENDPOINT)
            }
            documents::UPDATE_DOC => {
                let item_id = call.require_string("item_id").map_err(IntoToolError::into_tool_error)?;
                let setters = documents::setters(call).map_err(IntoToolError::into_tool_error)?;
                let doc = self
                    .service
                    .update_doc(&item_id, &setters)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                (doc, format!("Updated document {}", item_id), documents::UPDATE_ENDPOINT)
            }
            documents::CREATE_DOC => {
                let document = documents::document(call).map_err(IntoToolError::into_tool_error)?;
                let doc = self
                    .service
                    .create_doc(&document)
                    .await
                    .map_err(IntoToolError::into_tool_error)?;
                (doc, "Created document".to_string(), documents::CREATE_ENDPOINT)
            }
            _ => {
                let item_id = call.require_string("item_id").map_err(IntoToolError::into_tool_error)?;
                let doc = self.service.delete_doc(&item_id).await.map_err(IntoToolError::into_tool_error)?;
                (doc, format!("Deleted document {}", item_id), documents::DELETE_ENDPOINT)
            }
        };
        Ok(ToolOutput::new(data, summary, endpoint, 1))
    }

    async fn get_tasks(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let (items, label) = match call.get_date("date").map_err(IntoToolError::into_tool_error)? {
            Some(date) => (self.analytics.items_for_date(date).await, format_date(date)),
            None => (
                self.service
                    .today_items(None)
                    .await
                    .map_err(IntoToolError::into_tool_error)?,
                "today".to_string(),
            ),
        };
        let count = items.len();
        Ok(ToolOutput::new(
            to_data(&items)?,
            format!("Retrieved {} scheduled tasks for {}", count, label),
            tasks::TASKS_ENDPOINT,
            1,
        )
        .with_item_count(count))
    }

    async fn get_child_tasks(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let parent_id = call.require_string("parent_id").map_err(IntoToolError::into_tool_error)?;
        let recursive = call
            .get_bool("recursive")
            .map_err(IntoToolError::into_tool_error)?
            .unwrap_or(false);

        let result = if recursive {
            self.aggregate.children_recursive(&parent_id).await
        } else {
            self.aggregate
                .direct_children(&parent_id)
                .await
                .map_err(IntoToolError::into_tool_error)?
        };

        Ok(ToolOutput::new(
            to_data(&result)?,
            format!(
                "Retrieved {} child items for parent {}",
                result.total_children, parent_id
            ),
            tasks::CHILDREN_ENDPOINT,
            result.api_calls_made,
        )
        .with_item_count(result.total_children))
    }

    async fn get_all_tasks(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        let label = call.get_string("label").map_err(IntoToolError::into_tool_error)?;
        let fields = call
            .get_string_list("fields")
            .and_then(FieldProjection::from_requested);
        let result = self
            .aggregate
            .get_all_tasks(label.as_deref(), fields.as_ref())
            .await
            .map_err(IntoToolError::into_tool_error)?;

        Ok(ToolOutput::new(
            to_data(&result)?,
            result.summary.clone(),
            aggregation::TRAVERSAL_ENDPOINT,
            result.api_calls_made,
        )
        .with_item_count(result.total_tasks))
    }
}

#[async_trait]
impl<S, D> ToolExecutorPort for MarvinToolExecutor<S, D>
where
    S: TaskServicePort + TaskWriterPort + 'static,
    D: DocumentStorePort + 'static,
{
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let Some(definition) = self.definition(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
            );
        };
        let tool = definition.name.as_str();
        info!(tool, requested = %call.tool_name, "Executing tool");

        let outcome = match Self::check_required(call, definition) {
            Ok(()) => self.dispatch(tool, call).await,
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                debug!(
                    tool,
                    api_calls = output.api_calls,
                    duration_ms,
                    "Tool succeeded"
                );
                let mut result = ToolResult::success(tool, output.data)
                    .with_summary(output.summary)
                    .with_endpoint(output.endpoint)
                    .with_api_calls(output.api_calls)
                    .with_duration(duration_ms);
                if let Some(count) = output.item_count {
                    result = result.with_item_count(count);
                }
                result
            }
            Err(mut error) => {
                if error.endpoint.is_none() {
                    error.endpoint = nominal_endpoint(tool).map(str::to_string);
                }
                warn!(
                    tool,
                    code = %error.code,
                    endpoint = error.endpoint.as_deref().unwrap_or("-"),
                    error = %error.message,
                    "Tool failed"
                );
                ToolResult::failure(tool, error).with_duration(duration_ms)
            }
        }
    }
}

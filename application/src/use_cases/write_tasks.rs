//! Write Tasks use case
//!
//! Task and project creation, completion and their batch forms. Batches run
//! sequentially and record each item's failure without stopping; the
//! service ranks new items by arrival, so order is kept.
//!
//! The add-task endpoint does not always honour the requested parent. When
//! the created document names a different parent, a follow-up document
//! update moves it; if that correction fails the task still counts as
//! created and the failure is reported as a warning.

use crate::ports::task_service::{ServiceError, endpoints};
use crate::ports::task_writer::TaskWriterPort;
use marvin_domain::{
    BatchOutcome, DocSetter, NewProject, NewTask, ProjectWithTasks, fields,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A created document and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Created {
    pub document: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    pub api_calls: usize,
}

/// Use case for task and project writes
pub struct WriteTasksUseCase<W: TaskWriterPort + 'static> {
    writer: Arc<W>,
}

impl<W: TaskWriterPort + 'static> WriteTasksUseCase<W> {
    pub fn new(writer: Arc<W>) -> Self {
        Self { writer }
    }

    /// Create one task, then correct its parent if the service ignored it.
    pub async fn create_task(&self, task: &NewTask) -> Result<Created, ServiceError> {
        let mut document = self.writer.create_task(task).await?;
        let mut created = Created {
            document: Value::Null,
            warning: None,
            api_calls: 1,
        };

        let task_id = document
            .get(fields::ID)
            .and_then(Value::as_str)
            .map(str::to_string);
        let current_parent = document.get(fields::PARENT_ID).and_then(Value::as_str);

        if let Some(parent) = task.target_parent()
            && let Some(task_id) = task_id
            && current_parent != Some(parent)
        {
            debug!(task_id = %task_id, parent, "Correcting parent of created task");
            created.api_calls += 1;
            let setters = [DocSetter::new(fields::PARENT_ID, parent)];
            match self.writer.update_doc(&task_id, &setters).await {
                Ok(_) => {
                    if let Some(map) = document.as_object_mut() {
                        map.insert(fields::PARENT_ID.to_string(), json!(parent));
                    }
                }
                Err(e) => {
                    warn!(task_id = %task_id, parent, error = %e, "Parent correction failed");
                    created.warning = Some(format!(
                        "Task created but not moved to {}: {}",
                        parent, e
                    ));
                }
            }
        }

        created.document = document;
        Ok(created)
    }

    /// Create one task per title under the same parent.
    pub async fn batch_create(&self, titles: &[String], template: &NewTask) -> BatchOutcome {
        let mut outcome = BatchOutcome::new(titles.len());

        for title in titles {
            let task = NewTask {
                title: title.clone(),
                ..template.clone()
            };
            match self.create_task(&task).await {
                Ok(created) => {
                    outcome.api_calls_made += created.api_calls;
                    if let Some(warning) = created.warning {
                        outcome.warnings.push(warning);
                    }
                    outcome.record_success(created.document);
                }
                Err(e) => {
                    outcome.api_calls_made += 1;
                    warn!(title = %title, error = %e, "Task creation failed");
                    outcome.record_failure(title.as_str(), e);
                }
            }
        }

        info!(
            requested = outcome.total_requested,
            created = outcome.success_count,
            "Batch create finished"
        );
        outcome
    }

    pub async fn mark_done(&self, item_id: &str, timezone_offset: i64) -> Result<Value, ServiceError> {
        self.writer.mark_done(item_id, timezone_offset).await
    }

    /// Mark every id done; failures are collected per id.
    pub async fn batch_mark_done(&self, item_ids: &[String], timezone_offset: i64) -> BatchOutcome {
        let mut outcome = BatchOutcome::new(item_ids.len());

        for item_id in item_ids {
            outcome.api_calls_made += 1;
            match self.writer.mark_done(item_id, timezone_offset).await {
                Ok(task) => outcome.record_success(task),
                Err(e) => {
                    warn!(item_id = %item_id, error = %e, "Mark done failed");
                    outcome.record_failure(item_id.as_str(), e);
                }
            }
        }

        info!(
            requested = outcome.total_requested,
            completed = outcome.success_count,
            "Batch mark done finished"
        );
        outcome
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Value, ServiceError> {
        self.writer.create_project(project).await
    }

    /// Create a project, then one task per title inside it.
    ///
    /// Fails only when the project itself cannot be created or comes back
    /// without an identifier.
    pub async fn create_project_with_tasks(
        &self,
        project: &NewProject,
        titles: &[String],
    ) -> Result<ProjectWithTasks, ServiceError> {
        let created_project = self.writer.create_project(project).await?;
        let project_id = created_project
            .get(fields::ID)
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::Decode {
                endpoint: endpoints::ADD_PROJECT.to_string(),
                message: "created project has no _id".to_string(),
            })?
            .to_string();

        let mut tasks = self
            .batch_create(titles, &NewTask::new("").with_parent(project_id))
            .await;
        tasks.api_calls_made += 1;

        Ok(ProjectWithTasks {
            created_project,
            tasks,
        })
    }
}

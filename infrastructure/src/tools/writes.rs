//! Write tools: task and project creation and completion, single and batch.

use marvin_application::endpoints;
use marvin_domain::tool::entities::{CostClass, ToolCall, ToolDefinition, ToolParameter};
use marvin_domain::{DomainError, NewProject, NewTask};

pub const CREATE_TASK: &str = "create_task";
pub const BATCH_CREATE_TASKS: &str = "batch_create_tasks";
pub const MARK_TASK_DONE: &str = "mark_task_done";
pub const BATCH_MARK_DONE: &str = "batch_mark_done";
pub const CREATE_PROJECT: &str = "create_project";
pub const CREATE_PROJECT_WITH_TASKS: &str = "create_project_with_tasks";

pub const CREATE_TASK_ENDPOINT: &str = endpoints::ADD_TASK;
pub const MARK_DONE_ENDPOINT: &str = endpoints::MARK_DONE;
pub const CREATE_PROJECT_ENDPOINT: &str = endpoints::ADD_PROJECT;
pub const PROJECT_WITH_TASKS_ENDPOINT: &str = "/addProject + /addTask";

fn placement_parameters(definition: ToolDefinition) -> ToolDefinition {
    definition
        .with_parameter(
            ToolParameter::new("project_id", "Project to create the task in", false).with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("category_id", "Category to file the task under", false)
                .with_type("string"),
        )
}

fn timezone_parameter() -> ToolParameter {
    ToolParameter::new(
        "timezone_offset",
        "Minutes from UTC, e.g. -480 for PST (default: 0)",
        false,
    )
    .with_type("integer")
}

pub fn create_task_definition() -> ToolDefinition {
    placement_parameters(ToolDefinition::new(
        CREATE_TASK,
        "Create one task. When the service ignores the requested project or category the \
         task is moved there with a second call. For several tasks use batch_create_tasks.",
        CostClass::Fixed,
    ))
    .with_parameter(ToolParameter::new("title", "Task title", true).with_type("string"))
    .with_parameter(ToolParameter::new("due_date", "Due date (YYYY-MM-DD)", false).with_type("date"))
    .with_parameter(ToolParameter::new("note", "Task notes", false).with_type("string"))
}

pub fn batch_create_tasks_definition() -> ToolDefinition {
    placement_parameters(ToolDefinition::new(
        BATCH_CREATE_TASKS,
        "Create several tasks in the same project or category. A failed task is reported \
         and the rest are still created.",
        CostClass::Traversal,
    ))
    .with_parameter(ToolParameter::new("task_list", "Task titles", true).with_type("string[]"))
}

pub fn mark_task_done_definition() -> ToolDefinition {
    ToolDefinition::new(MARK_TASK_DONE, "Mark one task as completed.", CostClass::Single)
        .with_parameter(ToolParameter::new("item_id", "Task ID", true).with_type("string"))
        .with_parameter(timezone_parameter())
}

pub fn batch_mark_done_definition() -> ToolDefinition {
    ToolDefinition::new(
        BATCH_MARK_DONE,
        "Mark several tasks as completed, one call each. Failures are listed per task.",
        CostClass::Traversal,
    )
    .with_parameter(ToolParameter::new("task_ids", "Task IDs", true).with_type("string[]"))
    .with_parameter(timezone_parameter())
}

fn project_type_parameter() -> ToolParameter {
    ToolParameter::new("project_type", "Container type (default: project)", false).with_type("string")
}

pub fn create_project_definition() -> ToolDefinition {
    ToolDefinition::new(CREATE_PROJECT, "Create a project.", CostClass::Single)
        .with_parameter(ToolParameter::new("title", "Project title", true).with_type("string"))
        .with_parameter(project_type_parameter())
}

pub fn create_project_with_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_PROJECT_WITH_TASKS,
        "Create a project and a task for each title inside it.",
        CostClass::Traversal,
    )
    .with_parameter(ToolParameter::new("project_title", "Project title", true).with_type("string"))
    .with_parameter(ToolParameter::new("task_titles", "Task titles", true).with_type("string[]"))
    .with_parameter(project_type_parameter())
}

/// Task fields shared by `create_task` and the batch template
fn placed_task(call: &ToolCall, title: String) -> Result<NewTask, DomainError> {
    let mut task = NewTask::new(title);
    if let Some(project_id) = call.get_string("project_id")? {
        task = task.with_parent(project_id);
    }
    if let Some(category_id) = call.get_string("category_id")? {
        task = task.with_category(category_id);
    }
    Ok(task)
}

pub fn new_task(call: &ToolCall) -> Result<NewTask, DomainError> {
    let mut task = placed_task(call, call.require_string("title")?)?;
    if let Some(due_date) = call.get_date("due_date")? {
        task = task.with_due_date(due_date);
    }
    if let Some(note) = call.get_string("note")? {
        task = task.with_note(note);
    }
    Ok(task)
}

/// Titles plus the placement every batch task shares
pub fn batch_tasks(call: &ToolCall) -> Result<(Vec<String>, NewTask), DomainError> {
    Ok((require_list(call, "task_list")?, placed_task(call, String::new())?))
}

pub fn timezone_offset(call: &ToolCall) -> Result<i64, DomainError> {
    Ok(call.get_i64("timezone_offset")?.unwrap_or(0))
}

pub fn new_project(call: &ToolCall, title_key: &str) -> Result<NewProject, DomainError> {
    let project = NewProject::new(call.require_string(title_key)?);
    Ok(match call.get_string("project_type")? {
        Some(project_type) => project.with_type(project_type),
        None => project,
    })
}

pub fn require_list(call: &ToolCall, key: &str) -> Result<Vec<String>, DomainError> {
    call.get_string_list(key)
        .ok_or_else(|| DomainError::InvalidArgument(format!("{} must list at least one entry", key)))
}

//! Single-call read tools: scheduled items, projects, categories, labels,
//! due items and children.

use marvin_application::endpoints;
use marvin_domain::tool::entities::{CostClass, ToolDefinition, ToolParameter};

pub const GET_TASKS: &str = "get_tasks";
pub const GET_PROJECTS: &str = "get_projects";
pub const GET_CATEGORIES: &str = "get_categories";
pub const GET_LABELS: &str = "get_labels";
pub const GET_DUE_ITEMS: &str = "get_due_items";
pub const GET_CHILD_TASKS: &str = "get_child_tasks";

pub const TASKS_ENDPOINT: &str = endpoints::TODAY_ITEMS;
pub const PROJECTS_ENDPOINT: &str = endpoints::CATEGORIES;
pub const LABELS_ENDPOINT: &str = endpoints::LABELS;
pub const DUE_ENDPOINT: &str = endpoints::DUE_ITEMS;
pub const CHILDREN_ENDPOINT: &str = endpoints::CHILDREN;

pub fn get_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_TASKS,
        "Get scheduled tasks for today only, without overdue or completed items. \
         For a complete daily view use get_daily_productivity_overview.",
        CostClass::Single,
    )
    .with_parameter(
        ToolParameter::new(
            "date",
            "Scheduled date (YYYY-MM-DD). Defaults to today. A failed lookup for an explicit date returns an empty list.",
            false,
        )
        .with_type("string"),
    )
}

pub fn get_projects_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_PROJECTS,
        "Get all projects (categories with type 'project').",
        CostClass::Single,
    )
}

pub fn get_categories_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_CATEGORIES,
        "Get all categories and projects.",
        CostClass::Single,
    )
}

pub fn get_labels_definition() -> ToolDefinition {
    ToolDefinition::new(GET_LABELS, "Get all labels.", CostClass::Single)
}

pub fn get_due_items_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DUE_ITEMS,
        "Get overdue and due items only.",
        CostClass::Single,
    )
}

pub fn get_child_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_CHILD_TASKS,
        "Get the tasks and sub-projects below a parent task or project. \
         With recursive=true the whole subtree is walked, one call per container.",
        CostClass::Single,
    )
    .with_parameter(
        ToolParameter::new("parent_id", "ID of the parent task or project", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "recursive",
            "Walk all descendants instead of direct children (default: false)",
            false,
        )
        .with_type("boolean"),
    )
}

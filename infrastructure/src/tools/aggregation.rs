//! Whole-forest tools: `get_all_tasks`, `query_tasks` and `find_tasks`.
//!
//! All three accept the same filter vocabulary; [`task_filter`] turns a
//! [`ToolCall`] into the domain [`TaskFilter`].

use marvin_application::FIND_ENDPOINT;
use marvin_domain::tool::entities::{CostClass, ToolCall, ToolDefinition, ToolParameter};
use marvin_domain::{DomainError, QuerySource, TaskFilter};

pub const GET_ALL_TASKS: &str = "get_all_tasks";
pub const QUERY_TASKS: &str = "query_tasks";
pub const FIND_TASKS: &str = "find_tasks";

pub const TRAVERSAL_ENDPOINT: &str = "/categories + /children";
pub const QUERY_ENDPOINT: &str = FIND_ENDPOINT;

fn label_parameter() -> ToolParameter {
    ToolParameter::new("label", "Label name to filter by (case-insensitive)", false)
        .with_type("string")
}

fn fields_parameter() -> ToolParameter {
    ToolParameter::new(
        "fields",
        "Field names to return per task, e.g. [\"title\", \"day\", \"dueDate\"]. \"_id\" is always included.",
        false,
    )
    .with_type("array")
}

fn with_filter_parameters(definition: ToolDefinition) -> ToolDefinition {
    let date = |name: &str, description: &str| {
        ToolParameter::new(name, description, false).with_type("string")
    };
    definition
        .with_parameter(label_parameter())
        .with_parameter(fields_parameter())
        .with_parameter(
            ToolParameter::new("include_done", "Include completed tasks (default: false)", false)
                .with_type("boolean"),
        )
        .with_parameter(
            ToolParameter::new(
                "contains",
                "Case-insensitive text search across title and note",
                false,
            )
            .with_type("string"),
        )
        .with_parameter(date(
            "due",
            "Exact due date (YYYY-MM-DD). Takes precedence over due_before/due_after.",
        ))
        .with_parameter(date("due_before", "Due on or before this date (YYYY-MM-DD)"))
        .with_parameter(date("due_after", "Due on or after this date (YYYY-MM-DD)"))
        .with_parameter(date(
            "scheduled",
            "Exact scheduled date (YYYY-MM-DD). Takes precedence over scheduled_before/scheduled_after.",
        ))
        .with_parameter(date(
            "scheduled_before",
            "Scheduled on or before this date (YYYY-MM-DD)",
        ))
        .with_parameter(date(
            "scheduled_after",
            "Scheduled on or after this date (YYYY-MM-DD)",
        ))
        .with_parameter(
            ToolParameter::new("parent_id", "Parent category or project ID", false)
                .with_type("string"),
        )
        .with_parameter(
            ToolParameter::new("is_starred", "Starred status to match", false).with_type("boolean"),
        )
}

pub fn get_all_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_ALL_TASKS,
        "Get all tasks across all projects by walking the category tree, optionally \
         filtered by label. Heavy: one call per container.",
        CostClass::Traversal,
    )
    .with_parameter(label_parameter())
    .with_parameter(fields_parameter())
}

pub fn query_tasks_definition() -> ToolDefinition {
    with_filter_parameters(ToolDefinition::new(
        QUERY_TASKS,
        "Query tasks with a single CouchDB _find request. Requires AMAZING_MARVIN_DB_URI, \
         _DB_NAME, _DB_USER and _DB_PASSWORD; use get_all_tasks as a fallback.",
        CostClass::Fixed,
    ))
}

pub fn find_tasks_definition() -> ToolDefinition {
    with_filter_parameters(ToolDefinition::new(
        FIND_TASKS,
        "Filter tasks through CouchDB when credentials are configured, otherwise by \
         walking the category tree and filtering in memory. The result names the path used.",
        CostClass::Traversal,
    ))
}

/// Endpoint that served a reconciled result
pub fn source_endpoint(source: QuerySource) -> &'static str {
    match source {
        QuerySource::TreeTraversal => TRAVERSAL_ENDPOINT,
        QuerySource::DocumentStore => QUERY_ENDPOINT,
    }
}

/// Build a [`TaskFilter`] from the filter parameters of `call`.
pub fn task_filter(call: &ToolCall) -> Result<TaskFilter, DomainError> {
    let mut filter = TaskFilter::new()
        .with_due(
            call.get_date("due")?,
            call.get_date("due_before")?,
            call.get_date("due_after")?,
        )
        .with_scheduled(
            call.get_date("scheduled")?,
            call.get_date("scheduled_before")?,
            call.get_date("scheduled_after")?,
        );

    if let Some(label) = call.get_string("label")? {
        filter = filter.with_label(label);
    }
    if call.get_bool("include_done")?.unwrap_or(false) {
        filter = filter.including_done();
    }
    if let Some(text) = call.get_string("contains")? {
        filter = filter.containing(text);
    }
    if let Some(parent_id) = call.get_string("parent_id")? {
        filter = filter.with_parent(parent_id);
    }
    if let Some(starred) = call.get_bool("is_starred")? {
        filter = filter.starred(starred);
    }
    if let Some(fields) = call.get_string_list("fields") {
        filter = filter.with_fields(fields);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use marvin_domain::{DateFilter, Label, LabelResolution, build_selector, fields};
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_task_filter_from_arguments() {
        let call = ToolCall::new(QUERY_TASKS)
            .with_arg("label", "Urgent")
            .with_arg("include_done", "true")
            .with_arg("contains", "report")
            .with_arg("due_before", "2025-06-30")
            .with_arg("parent_id", "p1")
            .with_arg("is_starred", false)
            .with_arg("fields", json!(["title"]));

        let filter = task_filter(&call).unwrap();

        assert_eq!(filter.label.as_deref(), Some("Urgent"));
        assert!(filter.include_done);
        assert_eq!(filter.contains.as_deref(), Some("report"));
        assert_eq!(
            filter.due,
            DateFilter::Range {
                after: None,
                before: Some(date("2025-06-30")),
            }
        );
        assert!(filter.scheduled.is_any());
        assert_eq!(filter.parent_id.as_deref(), Some("p1"));
        assert_eq!(filter.starred, Some(false));
        assert_eq!(
            filter.fields.map(|f| f.names()),
            Some(vec!["_id".to_string(), "title".to_string()])
        );
    }

    #[test]
    fn test_numeric_arguments_still_narrow_the_filter() {
        let call = ToolCall::new(QUERY_TASKS)
            .with_arg("label", json!(2024))
            .with_arg("parent_id", json!(12345))
            .with_arg("contains", json!(42));

        let filter = task_filter(&call).unwrap();
        assert_eq!(filter.label.as_deref(), Some("2024"));
        assert_eq!(filter.parent_id.as_deref(), Some("12345"));
        assert_eq!(filter.contains.as_deref(), Some("42"));

        let labels = [Label::new("l2024", "2024")];
        let resolution = LabelResolution::resolve(filter.label.as_deref(), &labels);
        let selector = build_selector(&filter, &resolution).unwrap();
        assert_eq!(selector.get(fields::PARENT_ID), Some(&json!("12345")));
        assert!(selector.contains_key(fields::LABEL_IDS));
        assert!(selector.contains_key("$or"));
    }

    #[test]
    fn test_structured_value_for_text_argument_is_rejected() {
        let call = ToolCall::new(QUERY_TASKS).with_arg("label", json!({"name": "Urgent"}));
        assert!(matches!(task_filter(&call), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn test_exact_date_wins_over_bounds() {
        let call = ToolCall::new(QUERY_TASKS)
            .with_arg("scheduled", "2025-06-13")
            .with_arg("scheduled_after", "2025-06-01")
            .with_arg("scheduled_before", "2025-06-30");

        let filter = task_filter(&call).unwrap();
        assert_eq!(filter.scheduled, DateFilter::On(date("2025-06-13")));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let call = ToolCall::new(QUERY_TASKS).with_arg("due", "13/06/2025");
        assert!(matches!(task_filter(&call), Err(DomainError::InvalidDate(_))));
    }

    #[test]
    fn test_filter_tools_share_parameters() {
        let query: Vec<_> = query_tasks_definition()
            .parameters
            .into_iter()
            .map(|p| p.name)
            .collect();
        let find: Vec<_> = find_tasks_definition()
            .parameters
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(query, find);
        assert_eq!(query.len(), 12);
    }
}

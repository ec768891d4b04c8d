//! Completion history and snapshot tools.

use marvin_application::endpoints;
use marvin_domain::tool::entities::{CostClass, ToolCall, ToolDefinition, ToolParameter};
use marvin_domain::{DomainError, RangeRequest};

pub const GET_COMPLETED_TASKS_FOR_DATE: &str = "get_completed_tasks_for_date";
pub const GET_COMPLETED_TASKS: &str = "get_completed_tasks";
pub const GET_PRODUCTIVITY_SUMMARY: &str = "get_productivity_summary_for_time_range";
pub const GET_DAILY_OVERVIEW: &str = "get_daily_productivity_overview";
pub const GET_PROJECT_OVERVIEW: &str = "get_project_overview";

pub const COMPLETED_ENDPOINT: &str = endpoints::DONE_ITEMS;
pub const OVERVIEW_ENDPOINT: &str = "/todayItems + /dueItems + /doneItems";
pub const PROJECT_ENDPOINT: &str = "/categories + /children";

pub fn get_completed_tasks_for_date_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_COMPLETED_TASKS_FOR_DATE,
        "Get tasks completed on one date, grouped by project.",
        CostClass::Single,
    )
    .with_parameter(
        ToolParameter::new("date", "Date in YYYY-MM-DD format (e.g. 2025-06-13)", true)
            .with_type("string"),
    )
}

pub fn get_completed_tasks_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_COMPLETED_TASKS,
        "Get tasks completed over the past 7 days, one call per day.",
        CostClass::PerDay,
    )
}

pub fn get_productivity_summary_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_PRODUCTIVITY_SUMMARY,
        "Summarize completions over a date range, one call per day. Days that fail \
         to load count as zero and are listed in warnings.",
        CostClass::PerDay,
    )
    .with_parameter(
        ToolParameter::new(
            "days",
            "Days to analyze, ending today (default: 7). Ignored when start_date is given.",
            false,
        )
        .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("start_date", "Start date (YYYY-MM-DD)", false).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "end_date",
            "End date (YYYY-MM-DD). Defaults to today when start_date is given.",
            false,
        )
        .with_type("string"),
    )
}

pub fn get_daily_overview_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_DAILY_OVERVIEW,
        "Today's scheduled, overdue and completed items with counts and planning hints.",
        CostClass::Fixed,
    )
}

pub fn get_project_overview_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_PROJECT_OVERVIEW,
        "A project's record, pending and completed tasks, and completion percentage.",
        CostClass::Fixed,
    )
    .with_parameter(ToolParameter::new("project_id", "ID of the project", true).with_type("string"))
}

/// Read `days`, `start_date` and `end_date` from `call`
pub fn range_request(call: &ToolCall) -> Result<RangeRequest, DomainError> {
    Ok(RangeRequest {
        days: call.get_i64("days")?,
        start: call.get_date("start_date")?,
        end: call.get_date("end_date")?,
    })
}

//! Tool surface of the bridge
//!
//! Each submodule defines the tools for one area (name constants,
//! [`ToolDefinition`](marvin_domain::ToolDefinition)s and argument parsing);
//! [`MarvinToolExecutor`] routes calls to the use cases.
//!
//! - `tasks`: single-call reads
//! - `aggregation`: whole-forest search over either access path
//! - `analytics`: completion history and snapshots
//! - `account`: goals, profile, credential check
//! - `writes`: task and project creation and completion
//! - `documents`: raw document access (full-access token)

pub mod account;
pub mod aggregation;
pub mod analytics;
pub mod documents;
pub mod tasks;
pub mod writes;

mod executor;

pub use executor::MarvinToolExecutor;

use marvin_domain::tool::entities::ToolSpec;

/// Alternative names accepted for registered tools
pub const TOOL_ALIASES: [(&str, &str); 4] = [
    ("get_all_tasks_for_date", tasks::GET_TASKS),
    ("get_today_tasks", tasks::GET_TASKS),
    ("search_tasks", aggregation::FIND_TASKS),
    ("mark_done", writes::MARK_TASK_DONE),
];

/// Create the tool specification with every registered tool
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(tasks::get_tasks_definition())
        .register(tasks::get_projects_definition())
        .register(tasks::get_categories_definition())
        .register(tasks::get_labels_definition())
        .register(tasks::get_due_items_definition())
        .register(tasks::get_child_tasks_definition())
        .register(aggregation::get_all_tasks_definition())
        .register(aggregation::query_tasks_definition())
        .register(aggregation::find_tasks_definition())
        .register(analytics::get_completed_tasks_for_date_definition())
        .register(analytics::get_completed_tasks_definition())
        .register(analytics::get_productivity_summary_definition())
        .register(analytics::get_daily_overview_definition())
        .register(analytics::get_project_overview_definition())
        .register(account::get_goals_definition())
        .register(account::get_account_info_definition())
        .register(account::test_api_connection_definition())
        .register(writes::create_task_definition())
        .register(writes::batch_create_tasks_definition())
        .register(writes::mark_task_done_definition())
        .register(writes::batch_mark_done_definition())
        .register(writes::create_project_definition())
        .register(writes::create_project_with_tasks_definition())
        .register(documents::read_doc_definition())
        .register(documents::update_doc_definition())
        .register(documents::create_doc_definition())
        .register(documents::delete_doc_definition())
        .register_aliases(TOOL_ALIASES)
}

/// Endpoint a tool calls, used when a failure happens before any request
pub fn nominal_endpoint(tool: &str) -> Option<&'static str> {
    let endpoint = match tool {
        tasks::GET_TASKS => tasks::TASKS_ENDPOINT,
        tasks::GET_PROJECTS | tasks::GET_CATEGORIES => tasks::PROJECTS_ENDPOINT,
        tasks::GET_LABELS => tasks::LABELS_ENDPOINT,
        tasks::GET_DUE_ITEMS => tasks::DUE_ENDPOINT,
        tasks::GET_CHILD_TASKS => tasks::CHILDREN_ENDPOINT,
        aggregation::GET_ALL_TASKS | aggregation::FIND_TASKS => aggregation::TRAVERSAL_ENDPOINT,
        aggregation::QUERY_TASKS => aggregation::QUERY_ENDPOINT,
        analytics::GET_COMPLETED_TASKS_FOR_DATE
        | analytics::GET_COMPLETED_TASKS
        | analytics::GET_PRODUCTIVITY_SUMMARY => analytics::COMPLETED_ENDPOINT,
        analytics::GET_DAILY_OVERVIEW => analytics::OVERVIEW_ENDPOINT,
        analytics::GET_PROJECT_OVERVIEW => analytics::PROJECT_ENDPOINT,
        account::GET_GOALS => account::GOALS_ENDPOINT,
        account::GET_ACCOUNT_INFO => account::ACCOUNT_ENDPOINT,
        account::TEST_API_CONNECTION => account::TEST_ENDPOINT,
        writes::CREATE_TASK | writes::BATCH_CREATE_TASKS => writes::CREATE_TASK_ENDPOINT,
        writes::MARK_TASK_DONE | writes::BATCH_MARK_DONE => writes::MARK_DONE_ENDPOINT,
        writes::CREATE_PROJECT => writes::CREATE_PROJECT_ENDPOINT,
        writes::CREATE_PROJECT_WITH_TASKS => writes::PROJECT_WITH_TASKS_ENDPOINT,
        documents::READ_DOC => documents::READ_ENDPOINT,
        documents::UPDATE_DOC => documents::UPDATE_ENDPOINT,
        documents::CREATE_DOC => documents::CREATE_ENDPOINT,
        documents::DELETE_DOC => documents::DELETE_ENDPOINT,
        _ => return None,
    };
    Some(endpoint)
}

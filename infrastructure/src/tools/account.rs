//! Account tools: goals, profile and a credential check.

use marvin_application::endpoints;
use marvin_domain::tool::entities::{CostClass, ToolDefinition};

pub const GET_GOALS: &str = "get_goals";
pub const GET_ACCOUNT_INFO: &str = "get_account_info";
pub const TEST_API_CONNECTION: &str = "test_api_connection";

pub const GOALS_ENDPOINT: &str = endpoints::GOALS;
pub const ACCOUNT_ENDPOINT: &str = endpoints::ME;
pub const TEST_ENDPOINT: &str = endpoints::TEST;

pub fn get_goals_definition() -> ToolDefinition {
    ToolDefinition::new(GET_GOALS, "Get all goals.", CostClass::Single)
}

pub fn get_account_info_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_ACCOUNT_INFO,
        "Get the account profile of the configured API token.",
        CostClass::Single,
    )
}

pub fn test_api_connection_definition() -> ToolDefinition {
    ToolDefinition::new(
        TEST_API_CONNECTION,
        "Check that the API token is accepted. Returns the service's status text, usually OK.",
        CostClass::Single,
    )
}

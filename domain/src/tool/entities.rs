//! Tool domain entities

use crate::core::date::parse_date;
use crate::core::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Upstream cost of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostClass {
    /// Exactly one upstream call
    Single,
    /// A small fixed number of calls (label lookup, snapshots)
    Fixed,
    /// One call per calendar day in the requested range
    PerDay,
    /// One call per visited container
    Traversal,
}

impl CostClass {
    pub fn as_str(&self) -> &str {
        match self {
            CostClass::Single => "single",
            CostClass::Fixed => "fixed",
            CostClass::PerDay => "per_day",
            CostClass::Traversal => "traversal",
        }
    }

    /// Whether the call count grows with upstream data
    pub fn is_unbounded(&self) -> bool {
        matches!(self, CostClass::PerDay | CostClass::Traversal)
    }
}

impl std::fmt::Display for CostClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool exposed to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_all_tasks")
    pub name: String,
    pub description: String,
    pub cost: CostClass,
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Type hint ("string", "date", "integer", "boolean", "string[]")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, cost: CostClass) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            cost,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Registry of available tools plus alias mappings
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
    /// Alias → canonical name (e.g. "get_all_tasks_for_date" → "get_tasks")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve a registered name or an alias to the canonical name
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All definitions, sorted by name
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a non-empty string argument.
    ///
    /// Numbers and booleans are taken as their text (`2024` → `"2024"`);
    /// arrays and objects are rejected.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, DomainError> {
        let text = match self.arguments.get(key) {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            Some(other) => {
                return Err(DomainError::InvalidArgument(format!(
                    "{} must be a string, got {}",
                    key, other
                )));
            }
        };
        Ok((!text.trim().is_empty()).then_some(text))
    }

    pub fn require_string(&self, key: &str) -> Result<String, DomainError> {
        self.get_string(key)?
            .ok_or_else(|| DomainError::InvalidArgument(format!("Missing required argument: {}", key)))
    }

    /// Integers may arrive as JSON numbers or numeric strings
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, DomainError> {
        match self.arguments.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| DomainError::InvalidArgument(format!("{} must be an integer", key))),
            Some(serde_json::Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DomainError::InvalidArgument(format!("{} must be an integer, got '{}'", key, s))),
            Some(other) => Err(DomainError::InvalidArgument(format!(
                "{} must be an integer, got {}",
                key, other
            ))),
        }
    }

    /// Booleans may arrive as JSON booleans or "true"/"false" strings
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, DomainError> {
        match self.arguments.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Bool(b)) => Ok(Some(*b)),
            Some(serde_json::Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                _ => Err(DomainError::InvalidArgument(format!(
                    "{} must be a boolean, got '{}'",
                    key, s
                ))),
            },
            Some(other) => Err(DomainError::InvalidArgument(format!(
                "{} must be a boolean, got {}",
                key, other
            ))),
        }
    }

    /// Optional calendar date in `YYYY-MM-DD` form
    pub fn get_date(&self, key: &str) -> Result<Option<NaiveDate>, DomainError> {
        self.get_string(key)?.as_deref().map(parse_date).transpose()
    }

    pub fn require_date(&self, key: &str) -> Result<NaiveDate, DomainError> {
        parse_date(&self.require_string(key)?)
    }

    /// String list from a JSON array or a comma-separated string
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        let list: Vec<String> = match self.arguments.get(key)? {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .collect(),
            serde_json::Value::String(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
            _ => return None,
        };
        let list: Vec<String> = list.into_iter().filter(|s| !s.is_empty()).collect();
        (!list.is_empty()).then_some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cost_class() {
        assert!(!CostClass::Single.is_unbounded());
        assert!(CostClass::Traversal.is_unbounded());
        assert_eq!(CostClass::PerDay.to_string(), "per_day");
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("get_child_tasks", "Children of a project", CostClass::Single)
            .with_parameter(ToolParameter::new("parent_id", "Container id", true))
            .with_parameter(ToolParameter::new("recursive", "Walk sub-projects", false).with_type("boolean"));

        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.required_parameters().count(), 1);
        assert_eq!(tool.parameters[1].param_type, "boolean");
    }

    #[test]
    fn test_tool_spec_aliases() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("get_tasks", "Today", CostClass::Single))
            .register(ToolDefinition::new("get_all_tasks", "All", CostClass::Traversal))
            .register_aliases([("today", "get_tasks"), ("all_tasks", "get_all_tasks")]);

        assert_eq!(spec.resolve("get_tasks"), Some("get_tasks"));
        assert_eq!(spec.resolve("today"), Some("get_tasks"));
        assert_eq!(spec.resolve("unknown"), None);
        assert_eq!(spec.get_resolved("all_tasks").unwrap().name, "get_all_tasks");
        assert!(spec.get("today").is_none());
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["get_all_tasks", "get_tasks"]);
    }

    #[test]
    fn test_canonical_name_takes_priority_over_alias() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("get_labels", "Labels", CostClass::Single))
            .register(ToolDefinition::new("labels", "Other", CostClass::Single))
            .register_alias("labels", "get_labels");

        assert_eq!(spec.resolve("labels"), Some("labels"));
    }

    #[test]
    fn test_argument_coercion() {
        let call = ToolCall::new("query_tasks")
            .with_arg("days", "7")
            .with_arg("limit", 5)
            .with_arg("include_done", "true")
            .with_arg("starred", false)
            .with_arg("due_date", "2025-06-13")
            .with_arg("fields", "title, dueDate,")
            .with_arg("blank", "  ");

        assert_eq!(call.get_i64("days").unwrap(), Some(7));
        assert_eq!(call.get_i64("limit").unwrap(), Some(5));
        assert_eq!(call.get_i64("missing").unwrap(), None);
        assert_eq!(call.get_bool("include_done").unwrap(), Some(true));
        assert_eq!(call.get_bool("starred").unwrap(), Some(false));
        assert_eq!(
            call.get_date("due_date").unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap())
        );
        assert_eq!(
            call.get_string_list("fields"),
            Some(vec!["title".to_string(), "dueDate".to_string()])
        );
        assert_eq!(call.get_string("blank").unwrap(), None);
        assert!(call.require_string("blank").is_err());
    }

    #[test]
    fn test_invalid_arguments() {
        let call = ToolCall::new("x")
            .with_arg("days", "seven")
            .with_arg("flag", json!([1]))
            .with_arg("date", "13/06/2025");

        assert!(call.get_i64("days").is_err());
        assert!(call.get_bool("flag").is_err());
        assert!(call.get_date("date").is_err());
        assert!(call.require_date("missing").is_err());
    }

    #[test]
    fn test_scalar_arguments_read_as_text() {
        let call = ToolCall::new("get_all_tasks")
            .with_arg("label", json!(2024))
            .with_arg("parent_id", json!(12345))
            .with_arg("contains", json!(4.5))
            .with_arg("flag", json!(true))
            .with_arg("fields", json!(["title"]))
            .with_arg("nothing", json!(null));

        assert_eq!(call.get_string("label").unwrap().as_deref(), Some("2024"));
        assert_eq!(call.require_string("parent_id").unwrap(), "12345");
        assert_eq!(call.get_string("contains").unwrap().as_deref(), Some("4.5"));
        assert_eq!(call.get_string("flag").unwrap().as_deref(), Some("true"));
        assert_eq!(call.get_string("nothing").unwrap(), None);
        assert!(matches!(
            call.get_string("fields"),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_string_list_from_array() {
        let call = ToolCall::new("x").with_arg("fields", json!(["title", "", "note"]));
        assert_eq!(
            call.get_string_list("fields"),
            Some(vec!["title".to_string(), "note".to_string()])
        );
        let empty = ToolCall::new("x").with_arg("fields", json!([]));
        assert_eq!(empty.get_string_list("fields"), None);
    }
}

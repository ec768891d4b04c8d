//! Tool definitions rendered as MCP tool descriptors

use marvin_domain::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// JSON schema fragment for one parameter type hint
fn parameter_schema(param: &ToolParameter) -> Value {
    let mut schema = match param.param_type.as_str() {
        "integer" => json!({"type": "integer"}),
        "boolean" => json!({"type": "boolean"}),
        "date" => json!({"type": "string", "format": "date"}),
        "string[]" => json!({"type": "array", "items": {"type": "string"}}),
        "object" => json!({"type": "object"}),
        "object[]" => json!({"type": "array", "items": {"type": "object"}}),
        _ => json!({"type": "string"}),
    };
    schema["description"] = json!(param.description);
    schema
}

/// `{"name", "description", "inputSchema"}` for `tools/list`
pub fn tool_descriptor(tool: &ToolDefinition) -> Value {
    let properties: Map<String, Value> = tool
        .parameters
        .iter()
        .map(|p| (p.name.clone(), parameter_schema(p)))
        .collect();
    let required: Vec<&str> = tool.required_parameters().map(|p| p.name.as_str()).collect();

    json!({
        "name": tool.name,
        "description": tool.description,
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required,
        }
    })
}

//! Raw document tools. All four need the full-access token.

use marvin_application::endpoints;
use marvin_domain::tool::entities::{CostClass, ToolCall, ToolDefinition, ToolParameter};
use marvin_domain::{DocSetter, DomainError};
use serde_json::Value;

pub const READ_DOC: &str = "read_doc";
pub const UPDATE_DOC: &str = "update_doc";
pub const CREATE_DOC: &str = "create_doc";
pub const DELETE_DOC: &str = "delete_doc";

pub const READ_ENDPOINT: &str = endpoints::DOC;
pub const UPDATE_ENDPOINT: &str = endpoints::DOC_UPDATE;
pub const CREATE_ENDPOINT: &str = endpoints::DOC_CREATE;
pub const DELETE_ENDPOINT: &str = endpoints::DOC_DELETE;

fn item_id_parameter() -> ToolParameter {
    ToolParameter::new("item_id", "Document _id", true).with_type("string")
}

pub fn read_doc_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_DOC,
        "Read any document (task, project, category) by ID with all of its fields.",
        CostClass::Single,
    )
    .with_parameter(item_id_parameter())
}

pub fn update_doc_definition() -> ToolDefinition {
    ToolDefinition::new(
        UPDATE_DOC,
        "Set individual fields on any document, e.g. [{\"key\": \"dueDate\", \"val\": \"2025-07-01\"}]. \
         Use parentId to move a task and an empty dueDate to clear it.",
        CostClass::Single,
    )
    .with_parameter(item_id_parameter())
    .with_parameter(
        ToolParameter::new("setters", "List of {\"key\": field, \"val\": value} objects", true)
            .with_type("object[]"),
    )
}

pub fn create_doc_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_DOC,
        "Create a document with full control over its fields. Default task fields are not \
         filled in; prefer create_task for tasks.",
        CostClass::Single,
    )
    .with_parameter(
        ToolParameter::new("doc_data", "Document object, e.g. {\"_id\", \"db\", \"title\"}", true)
            .with_type("object"),
    )
}

pub fn delete_doc_definition() -> ToolDefinition {
    ToolDefinition::new(DELETE_DOC, "Delete any document by ID.", CostClass::Single)
        .with_parameter(item_id_parameter())
}

/// Setters from a JSON array, or a JSON string holding one
pub fn setters(call: &ToolCall) -> Result<Vec<DocSetter>, DomainError> {
    let value = match call.arguments.get("setters") {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .map_err(|e| DomainError::InvalidArgument(format!("setters is not valid JSON: {}", e)))?,
        Some(value) => value.clone(),
        None => Value::Null,
    };
    let setters: Vec<DocSetter> = serde_json::from_value(value).map_err(|e| {
        DomainError::InvalidArgument(format!(
            "setters must be a list of {{\"key\", \"val\"}} objects: {}",
            e
        ))
    })?;
    if setters.is_empty() {
        return Err(DomainError::InvalidArgument(
            "setters must contain at least one entry".to_string(),
        ));
    }
    Ok(setters)
}

pub fn document(call: &ToolCall) -> Result<Value, DomainError> {
    match call.arguments.get("doc_data") {
        Some(value @ Value::Object(_)) => Ok(value.clone()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => Ok(value),
            _ => Err(DomainError::InvalidArgument(
                "doc_data must be a JSON object".to_string(),
            )),
        },
        _ => Err(DomainError::InvalidArgument(
            "doc_data must be a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setters_from_array_or_text() {
        let call = ToolCall::new(UPDATE_DOC)
            .with_arg("setters", json!([{"key": "title", "val": "Renamed"}]));
        assert_eq!(setters(&call).unwrap(), vec![DocSetter::new("title", "Renamed")]);

        let call = ToolCall::new(UPDATE_DOC).with_arg("setters", r#"[{"key": "dueDate", "val": ""}]"#);
        assert_eq!(setters(&call).unwrap()[0].key, "dueDate");
    }

    #[test]
    fn test_malformed_setters_are_rejected() {
        for bad in [json!([]), json!([{"field": "title"}]), json!("not json"), json!(3)] {
            let call = ToolCall::new(UPDATE_DOC).with_arg("setters", bad);
            assert!(matches!(setters(&call), Err(DomainError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_document_must_be_object() {
        let call = ToolCall::new(CREATE_DOC).with_arg("doc_data", json!({"db": "Tasks", "title": "x"}));
        assert_eq!(document(&call).unwrap()["db"], "Tasks");

        let call = ToolCall::new(CREATE_DOC).with_arg("doc_data", r#"{"title": "y"}"#);
        assert_eq!(document(&call).unwrap()["title"], "y");

        let call = ToolCall::new(CREATE_DOC).with_arg("doc_data", json!(["x"]));
        assert!(document(&call).is_err());
    }
}

//! Tool argument parsing from `--arg KEY=VALUE` and `--json`

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Invalid argument '{0}': expected KEY=VALUE")]
    MissingSeparator(String),

    #[error("Invalid argument '{0}': key is empty")]
    EmptyKey(String),

    #[error("--json must be a JSON object: {0}")]
    InvalidJson(String),
}

/// Merge `--json` and `--arg` pairs into tool arguments.
///
/// A value that parses as JSON keeps its type (`30`, `true`, `["a"]`);
/// anything else is taken as a plain string.
pub fn parse_arguments(
    pairs: &[String],
    json: Option<&str>,
) -> Result<HashMap<String, Value>, ArgumentError> {
    let mut arguments = HashMap::new();

    if let Some(json) = json {
        let object: Map<String, Value> =
            serde_json::from_str(json).map_err(|e| ArgumentError::InvalidJson(e.to_string()))?;
        arguments.extend(object);
    }

    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| ArgumentError::MissingSeparator(pair.clone()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ArgumentError::EmptyKey(pair.clone()));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        arguments.insert(key.to_string(), value);
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_values_keep_json_types() {
        let args = parse_arguments(
            &pairs(&["days=14", "include_done=true", "fields=[\"title\"]", "date=2025-06-13"]),
            None,
        )
        .unwrap();

        assert_eq!(args["days"], json!(14));
        assert_eq!(args["include_done"], json!(true));
        assert_eq!(args["fields"], json!(["title"]));
        assert_eq!(args["date"], json!("2025-06-13"));
    }

    #[test]
    fn test_arg_overrides_json() {
        let args = parse_arguments(
            &pairs(&["label=Home"]),
            Some(r#"{"label": "Work", "contains": "report"}"#),
        )
        .unwrap();

        assert_eq!(args["label"], json!("Home"));
        assert_eq!(args["contains"], json!("report"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let args = parse_arguments(&pairs(&["contains=a=b"]), None).unwrap();
        assert_eq!(args["contains"], json!("a=b"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(
            parse_arguments(&pairs(&["label"]), None),
            Err(ArgumentError::MissingSeparator("label".to_string()))
        );
        assert!(matches!(
            parse_arguments(&pairs(&["=x"]), None),
            Err(ArgumentError::EmptyKey(_))
        ));
        assert!(matches!(
            parse_arguments(&[], Some("[1, 2]")),
            Err(ArgumentError::InvalidJson(_))
        ));
    }
}

//! JSON-RPC loop over stdin/stdout.
//!
//! stdout carries protocol messages only; logs go to stderr through
//! `tracing`.

use super::schema::tool_descriptor;
use crate::output::console::ConsoleFormatter;
use marvin_application::ToolExecutorPort;
use marvin_domain::ToolCall;
use serde_json::{Value, json};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "marvin-bridge";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// MCP server exposing every tool of an executor
pub struct McpServer<E: ToolExecutorPort> {
    executor: E,
}

impl<E: ToolExecutorPort> McpServer<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn run(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Serve newline-delimited requests from `reader`, answering on `writer`
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(tools = self.executor.tool_spec().len(), "MCP server started");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(response) = self.handle_message(line).await {
                let mut bytes = response.to_string().into_bytes();
                bytes.push(b'\n');
                writer.write_all(&bytes).await?;
                writer.flush().await?;
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Answer one message; notifications get no response
    pub async fn handle_message(&self, line: &str) -> Option<Value> {
        let request: Value = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(error_response(Value::Null, PARSE_ERROR, format!("Parse error: {}", e)));
            }
        };

        let Some(method) = request.get("method").and_then(Value::as_str) else {
            let id = request.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(id, INVALID_REQUEST, "Missing method"));
        };
        // A request without an id is a notification
        let id = request.get("id").cloned()?;
        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));
        debug!(method, "MCP request");

        Some(match method {
            "initialize" => success_response(id, self.initialize()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, self.tools_list()),
            "tools/call" => match tool_call(&params) {
                Ok(call) => success_response(id, self.tools_call(&call).await),
                Err(message) => error_response(id, INVALID_PARAMS, message),
            },
            _ => error_response(id, METHOD_NOT_FOUND, format!("Method not found: {}", method)),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }
        })
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<Value> = self.executor.tool_spec().all().map(tool_descriptor).collect();
        json!({ "tools": tools })
    }

    /// Tool failures are results with `isError`, not protocol errors
    async fn tools_call(&self, call: &ToolCall) -> Value {
        let result = self.executor.execute(call).await;
        json!({
            "content": [{
                "type": "text",
                "text": ConsoleFormatter::format_json(&result, false),
            }],
            "isError": !result.is_success(),
        })
    }
}

fn tool_call(params: &Value) -> Result<ToolCall, String> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| "tools/call needs a tool name".to_string())?;
    let arguments: HashMap<String, Value> = match params.get("arguments") {
        None | Some(Value::Null) => HashMap::new(),
        Some(Value::Object(map)) => map.clone().into_iter().collect(),
        Some(_) => return Err("tools/call arguments must be an object".to_string()),
    };
    Ok(ToolCall {
        tool_name: name.to_string(),
        arguments,
    })
}

fn success_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message.into() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marvin_domain::{CostClass, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec};
    use std::sync::Mutex;

    struct StubExecutor {
        spec: ToolSpec,
        calls: Mutex<Vec<ToolCall>>,
    }

    impl StubExecutor {
        fn new() -> Self {
            let spec = ToolSpec::new().register(
                ToolDefinition::new("get_child_tasks", "Children of a parent", CostClass::Single)
                    .with_parameter(ToolParameter::new("parent_id", "Parent ID", true)),
            );
            Self {
                spec,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for StubExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            if self.definition(&call.tool_name).is_none() {
                return ToolResult::failure(&call.tool_name, ToolError::not_found("Unknown tool"));
            }
            ToolResult::success(&call.tool_name, json!({"total_children": 0}))
                .with_summary("Retrieved 0 child items")
        }
    }

    fn server() -> McpServer<StubExecutor> {
        McpServer::new(StubExecutor::new())
    }

    async fn ask(server: &McpServer<StubExecutor>, message: Value) -> Value {
        server.handle_message(&message.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let server = server();

        let init = ask(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})).await;
        assert_eq!(init["id"], 1);
        assert_eq!(init["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(init["result"]["serverInfo"]["name"], "marvin-bridge");

        let list = ask(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
        let tools = list["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["parent_id"]));
    }

    #[tokio::test]
    async fn test_call_wraps_result_envelope() {
        let server = server();
        let response = ask(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": "c1",
                "method": "tools/call",
                "params": {"name": "get_child_tasks", "arguments": {"parent_id": 12345}}
            }),
        )
        .await;

        assert_eq!(response["id"], "c1");
        assert_eq!(response["result"]["isError"], false);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let envelope: Value = serde_json::from_str(text).unwrap();
        assert_eq!(envelope["summary"], "Retrieved 0 child items");

        let calls = server.executor.calls.lock().unwrap();
        assert_eq!(calls[0].arguments["parent_id"], json!(12345));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let server = server();
        let response = ask(
            &server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "nope"}}),
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        assert!(response.get("error").is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server();

        let parse = server.handle_message("{not json").await.unwrap();
        assert_eq!(parse["error"]["code"], PARSE_ERROR);

        let unknown = ask(&server, json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"})).await;
        assert_eq!(unknown["error"]["code"], METHOD_NOT_FOUND);

        let bad_params = ask(
            &server,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "get_child_tasks", "arguments": [1]}}),
        )
        .await;
        assert_eq!(bad_params["error"]["code"], INVALID_PARAMS);

        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(server.handle_message(&notification.to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_serve_answers_each_line() {
        let server = server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
    }
}

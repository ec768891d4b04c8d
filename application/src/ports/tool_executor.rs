//! Tool executor port
//!
//! The boundary between a transport (CLI, agent protocol) and the use cases:
//! a named call goes in, a [`ToolResult`] with payload or endpoint-tagged
//! error comes out.

use async_trait::async_trait;
use marvin_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Every registered tool and alias
    fn tool_spec(&self) -> &ToolSpec;

    /// Definition for a tool name or alias
    fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Run one call. Failures are reported inside the result, never as a panic
    /// or a transport error.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}

//! Output formatter trait

use marvin_domain::{ToolResult, ToolSpec};

/// Trait for rendering tool results
pub trait OutputFormatter {
    /// Format one tool result
    fn format(&self, result: &ToolResult) -> String;

    /// Format the list of available tools
    fn format_tools(&self, spec: &ToolSpec) -> String;
}

//! Console output formatter for tool results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use marvin_domain::{OutputFormat, ToolResult, ToolSpec};
use serde_json::{Value, json};

/// Formats tool results for the terminal or as a JSON envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    format: OutputFormat,
    debug: bool,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            debug: false,
        }
    }

    /// Keep timing metadata in the output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The response envelope: `success`, `data` or `error`, `summary`, `metadata`.
    ///
    /// `metadata.duration_ms` is only present in debug mode.
    pub fn envelope(result: &ToolResult, debug: bool) -> Value {
        let mut result = result.clone();
        if !debug {
            result.metadata.duration_ms = None;
        }
        serde_json::to_value(&result).unwrap_or_else(|e| {
            json!({
                "tool_name": result.tool_name,
                "success": false,
                "error": {"code": "INTERNAL_ERROR", "message": e.to_string()},
            })
        })
    }

    /// Format as JSON
    pub fn format_json(result: &ToolResult, debug: bool) -> String {
        serde_json::to_string_pretty(&Self::envelope(result, debug))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Format for a human reader
    pub fn format_pretty(result: &ToolResult, debug: bool) -> String {
        let mut output = String::new();

        match result.error() {
            None => {
                output.push_str(&format!("{} {}\n", "✓".green().bold(), result.tool_name.bold()));
                if let Some(summary) = &result.summary {
                    output.push_str(&format!("{}\n", summary));
                }
            }
            Some(error) => {
                output.push_str(&format!(
                    "{} {} {}\n",
                    "✗".red().bold(),
                    result.tool_name.bold(),
                    format!("[{}]", error.code).red()
                ));
                output.push_str(&format!("{}\n", error.message));
                if let Some(suggestion) = &error.suggestion {
                    output.push_str(&format!("{} {}\n", "Hint:".yellow().bold(), suggestion));
                }
            }
        }

        output.push_str(&Self::metadata_line(result, debug));

        if let Some(data) = result.data() {
            let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            output.push('\n');
            output.push_str(&body);
            output.push('\n');
        }

        output
    }

    fn metadata_line(result: &ToolResult, debug: bool) -> String {
        let meta = &result.metadata;
        let mut parts = Vec::new();
        if let Some(endpoint) = &meta.endpoint {
            parts.push(format!("endpoint: {}", endpoint));
        }
        if let Some(calls) = meta.api_calls_made {
            parts.push(format!("api calls: {}", calls));
        }
        if let Some(count) = meta.item_count {
            parts.push(format!("items: {}", count));
        }
        if debug && let Some(ms) = meta.duration_ms {
            parts.push(format!("{} ms", ms));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("{}\n", parts.join(" | ").dimmed())
        }
    }

    /// Format the tool list
    pub fn format_tool_list(spec: &ToolSpec) -> String {
        let mut tools: Vec<_> = spec.all().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        let mut output = String::new();
        for tool in tools {
            output.push_str(&format!(
                "{} {}\n  {}\n",
                tool.name.cyan().bold(),
                format!("({})", tool.cost).dimmed(),
                tool.description
            ));
            for param in &tool.parameters {
                let required = if param.required { " required" } else { "" };
                output.push_str(&format!(
                    "    {} {}{}: {}\n",
                    param.name.yellow(),
                    format!("<{}>", param.param_type).dimmed(),
                    required,
                    param.description
                ));
            }
        }
        output
    }

    /// Format the tool list as JSON
    pub fn format_tool_list_json(spec: &ToolSpec) -> String {
        let mut tools: Vec<_> = spec.all().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        serde_json::to_string_pretty(&tools).unwrap_or_else(|_| "[]".to_string())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &ToolResult) -> String {
        match self.format {
            OutputFormat::Pretty => Self::format_pretty(result, self.debug),
            OutputFormat::Json => Self::format_json(result, self.debug),
        }
    }

    fn format_tools(&self, spec: &ToolSpec) -> String {
        match self.format {
            OutputFormat::Pretty => Self::format_tool_list(spec),
            OutputFormat::Json => Self::format_tool_list_json(spec),
        }
    }
}

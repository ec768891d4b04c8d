//! Presentation layer for marvin-bridge
//!
//! This crate contains CLI definitions, argument parsing for tool calls,
//! output formatters for tool results, and the MCP stdio server.

pub mod cli;
pub mod mcp;
pub mod output;

// Re-export commonly used types
pub use cli::arguments::{ArgumentError, parse_arguments};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use mcp::McpServer;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;

//! Model Context Protocol server
//!
//! Newline-delimited JSON-RPC 2.0 on stdin/stdout. Every registered tool is
//! listed with a JSON schema derived from its parameters; calls go through
//! the same [`ToolExecutorPort`](marvin_application::ToolExecutorPort) as
//! the one-shot CLI.

pub mod schema;
pub mod server;

pub use server::McpServer;

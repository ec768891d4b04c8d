//! Tool domain module
//!
//! The agent-facing surface of the bridge. Every tool is described by a
//! [`ToolDefinition`] (name, parameters, upstream cost class), invoked with a
//! [`ToolCall`], and answered with a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (payload +   │
//! └──────┬───────┘    └──────────────┘    │  metadata)   │
//!        │                                └──────────────┘
//!        ├─ aliases: "get_all_tasks_for_date" → "get_tasks"
//!        └─ tools:   "get_all_tasks" → ToolDefinition
//! ```
//!
//! The [`CostClass`] tells the caller how the number of upstream calls
//! scales:
//!
//! | Cost | Examples |
//! |------|----------|
//! | **Single** | `get_tasks`, `get_labels`, `create_task`, `read_doc` |
//! | **Fixed** | `query_tasks`, `get_daily_productivity_overview` |
//! | **PerDay** | `get_productivity_summary_for_time_range` |
//! | **Traversal** | `get_all_tasks`, `batch_create_tasks`, `batch_mark_done` |

pub mod entities;
pub mod value_objects;

pub use entities::{CostClass, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};

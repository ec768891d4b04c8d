//! Domain layer for marvin-bridge
//!
//! Pure types and algorithms for aggregating and querying a personal
//! task-management service. No I/O lives here; the application layer drives
//! these types through ports.
//!
//! # Core Concepts
//!
//! ## Two access paths
//!
//! - **Traversal path**: walk the category/project tree through the REST API,
//!   accumulating tasks with a visited-container guard ([`Traversal`])
//! - **Store path**: push a [`Selector`] built from the same [`TaskFilter`]
//!   down to the document store
//!
//! Both paths end in [`normalize_documents`], so callers see the same
//! [`AggregationResult`] shape whichever path served them.
//!
//! ## Analytics
//!
//! Completed-item grouping, per-day range summaries with absorbed failures,
//! and daily/project snapshots.
//!
//! ## Writes
//!
//! [`NewTask`], [`NewProject`] and [`DocSetter`] describe changes; batches
//! report per-item failures in a [`BatchOutcome`] instead of aborting.

pub mod aggregation;
pub mod analytics;
pub mod config;
pub mod core;
pub mod document;
pub mod query;
pub mod tool;

// Re-export commonly used types
pub use aggregation::{
    AggregationResult, ChildrenResult, QuerySource, SkippedContainer, SubtreeOutcome, Traversal,
    TraversalOutput,
};
pub use analytics::{
    CompletedForDate, DailyOverview, DateRange, DayOutcome, DaySummary, OverviewCounts,
    ProjectOverview, RangeRequest, RangeSummary,
};
pub use config::OutputFormat;
pub use core::{
    date::{format_date, parse_date},
    error::DomainError,
};
pub use document::{
    BatchFailure, BatchOutcome, DEFAULT_PROJECT_TYPE, DocSetter, DocumentKind, Label, NewProject,
    NewTask, ProjectWithTasks, TaskDocument, UNASSIGNED_PARENT, fields,
};
pub use query::{
    DateFilter, FieldProjection, FilterEvaluator, LabelResolution, Normalized, Selector,
    TASKS_COLLECTION, TaskFilter, build_selector, normalize_documents,
};
pub use tool::{
    CostClass, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolResultMetadata,
    ToolSpec,
};

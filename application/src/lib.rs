//! Application layer for marvin-bridge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AggregationSettings, STORE_SETTING_NAMES, StoreCredentials};
pub use ports::{
    document_store::{DocumentStorePort, FIND_ENDPOINT, StoreError},
    task_service::{FULL_ACCESS_TOKEN_ENV, ServiceError, TaskServicePort, endpoints},
    task_writer::TaskWriterPort,
    tool_executor::ToolExecutorPort,
};
pub use use_cases::aggregate_tasks::{AggregateError, AggregateTasksUseCase};
pub use use_cases::analytics::{AnalyticsError, AnalyticsUseCase, RECENT_COMPLETION_DAYS};
pub use use_cases::query_tasks::{QueryTasksError, QueryTasksUseCase};
pub use use_cases::write_tasks::{Created, WriteTasksUseCase};

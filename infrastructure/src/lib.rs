//! Infrastructure layer for marvin-bridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP task service client, the document
//! store client, the tool executor, and configuration file loading.

pub mod config;
pub mod marvin;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAggregationConfig, FileApiConfig, FileConfig,
    FileOutputConfig, FileOutputFormat, FileStoreConfig,
};
pub use marvin::{ClientBuildError, CouchDbStore, MarvinApiClient};
pub use tools::{MarvinToolExecutor, default_tool_spec};

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod document_store;
pub mod task_service;
pub mod task_writer;
pub mod tool_executor;

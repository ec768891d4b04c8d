//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod aggregate_tasks;
pub mod analytics;
pub mod query_tasks;
pub(crate) mod shared;
pub mod write_tasks;

#[cfg(test)]
pub(crate) mod testing;

//! Documents owned by the task-management service.
//!
//! Tasks, projects and categories share one document shape and are told
//! apart by their `type` field. Labels are a separate, strongly-typed entity.
//! [`write`] holds the payloads sent when creating or changing documents.

pub mod entities;
pub mod write;

pub use entities::{DocumentKind, Label, TaskDocument, UNASSIGNED_PARENT, fields};
pub use write::{
    BatchFailure, BatchOutcome, DEFAULT_PROJECT_TYPE, DocSetter, NewProject, NewTask, ProjectWithTasks,
};

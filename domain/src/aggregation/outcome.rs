//! Per-subtree fetch outcomes

use crate::document::TaskDocument;
use serde::{Deserialize, Serialize};

/// Result of fetching one container's direct children.
///
/// A failed fetch is carried as data so the traversal can merge it like any
/// other outcome and keep going.
#[derive(Debug, Clone, PartialEq)]
pub enum SubtreeOutcome {
    Fetched {
        container_id: String,
        children: Vec<TaskDocument>,
    },
    Absorbed(SkippedContainer),
}

impl SubtreeOutcome {
    pub fn fetched(container_id: impl Into<String>, children: Vec<TaskDocument>) -> Self {
        SubtreeOutcome::Fetched {
            container_id: container_id.into(),
            children,
        }
    }

    pub fn absorbed(container_id: impl Into<String>, reason: impl Into<String>) -> Self {
        SubtreeOutcome::Absorbed(SkippedContainer {
            container_id: container_id.into(),
            reason: reason.into(),
        })
    }

    pub fn container_id(&self) -> &str {
        match self {
            SubtreeOutcome::Fetched { container_id, .. } => container_id,
            SubtreeOutcome::Absorbed(skipped) => &skipped.container_id,
        }
    }
}

/// A container whose children could not be fetched and was treated as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedContainer {
    pub container_id: String,
    pub reason: String,
}

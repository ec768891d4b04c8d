//! Tree traversal state
//!
//! [`Traversal`] holds everything one aggregation accumulates: the visited
//! container set, the de-duplicated task list and the absorbed failures. It
//! performs no I/O; the caller fetches children for the ids it hands out and
//! feeds the outcomes back in, in any order.
//!
//! ```text
//! roots ──enqueue()──▶ frontier ──fetch──▶ SubtreeOutcome ──absorb()──▶ next frontier
//!                         ▲                                                │
//!                         └────────────────────────────────────────────────┘
//! ```
//!
//! A container id is marked visited when it is handed out, not when its
//! children arrive, so ids returned by [`Traversal::absorb`] are always new
//! and no container is fetched twice even with concurrent fetches in flight.

use super::outcome::{SkippedContainer, SubtreeOutcome};
use crate::document::TaskDocument;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Traversal {
    label_id: Option<String>,
    visited: HashSet<String>,
    seen_tasks: HashSet<String>,
    tasks: Vec<TaskDocument>,
    containers: Vec<TaskDocument>,
    skipped: Vec<SkippedContainer>,
    fetches: usize,
}

/// Everything a finished traversal produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraversalOutput {
    pub tasks: Vec<TaskDocument>,
    /// Sub-container documents discovered below the roots
    pub containers: Vec<TaskDocument>,
    pub skipped: Vec<SkippedContainer>,
    /// Children fetches performed (one per visited container)
    pub fetches: usize,
    pub containers_visited: usize,
}

impl Traversal {
    /// Start a traversal; tasks without `label_id` are discarded on arrival.
    pub fn new(label_id: Option<String>) -> Self {
        Self {
            label_id,
            ..Default::default()
        }
    }

    /// Mark a container as visited. Returns `false` if it already was.
    pub fn enqueue(&mut self, container_id: &str) -> bool {
        self.visited.insert(container_id.to_string())
    }

    /// Queue every root that has an identifier and has not been seen.
    pub fn enqueue_roots<'a>(&mut self, roots: impl IntoIterator<Item = &'a TaskDocument>) -> Vec<String> {
        roots
            .into_iter()
            .filter_map(|root| root.id())
            .filter(|id| self.enqueue(id))
            .map(str::to_string)
            .collect()
    }

    /// Merge one fetch outcome and return the sub-containers to fetch next.
    pub fn absorb(&mut self, outcome: SubtreeOutcome) -> Vec<String> {
        self.fetches += 1;
        match outcome {
            SubtreeOutcome::Absorbed(skipped) => {
                self.skipped.push(skipped);
                Vec::new()
            }
            SubtreeOutcome::Fetched { children, .. } => {
                let mut next = Vec::new();
                for child in children {
                    if child.is_container() {
                        if let Some(id) = child.id().map(str::to_string)
                            && self.enqueue(&id)
                        {
                            next.push(id);
                            self.containers.push(child);
                        }
                    } else {
                        self.accept_task(child);
                    }
                }
                next
            }
        }
    }

    fn accept_task(&mut self, task: TaskDocument) {
        if let Some(label_id) = &self.label_id
            && !task.has_label(label_id)
        {
            return;
        }
        if let Some(id) = task.id()
            && !self.seen_tasks.insert(id.to_string())
        {
            return;
        }
        self.tasks.push(task);
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn finish(self) -> TraversalOutput {
        TraversalOutput {
            tasks: self.tasks,
            containers: self.containers,
            skipped: self.skipped,
            fetches: self.fetches,
            containers_visited: self.visited.len(),
        }
    }
}

//! Task queries
//!
//! One [`TaskFilter`] drives both access paths:
//!
//! ```text
//!                ┌──────────────────┐
//!                │ TaskFilter       │
//!                │ + LabelResolution│
//!                └────────┬─────────┘
//!          ┌──────────────┴──────────────┐
//!          ▼                             ▼
//!  build_selector()              FilterEvaluator
//!  (store path, pushed down)     (traversal path, in memory)
//!          │                             │
//!          └──────────────┬──────────────┘
//!                         ▼
//!         normalize(): drop containers, project fields
//! ```

pub mod evaluator;
pub mod filter;
pub mod normalize;
pub mod projection;
pub mod selector;

pub use evaluator::FilterEvaluator;
pub use filter::{DateFilter, LabelResolution, TaskFilter};
pub use normalize::{Normalized, normalize_documents};
pub use projection::FieldProjection;
pub use selector::{Selector, TASKS_COLLECTION, build_selector, case_insensitive_pattern};

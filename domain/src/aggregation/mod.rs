//! Task aggregation
//!
//! - [`Traversal`] — visited-guarded, order-independent accumulation of a
//!   container tree into a flat task list
//! - [`SubtreeOutcome`] — one container's children, or an absorbed failure
//! - [`AggregationResult`] / [`ChildrenResult`] — normalized output shapes

pub mod outcome;
pub mod result;
pub mod traversal;

pub use outcome::{SkippedContainer, SubtreeOutcome};
pub use result::{AggregationResult, ChildrenResult, QuerySource};
pub use traversal::{Traversal, TraversalOutput};

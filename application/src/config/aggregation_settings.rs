//! Aggregation parameters: fan-out and range defaults.

use serde::{Deserialize, Serialize};

/// Limits applied by the traversal, query and analytics use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Upper bound on concurrent upstream fetches within one request.
    pub max_concurrency: usize,
    /// Days covered by a range summary when the caller gives neither dates nor a count.
    pub range_default_days: i64,
    /// Longest range a summary may cover; each day costs one upstream call.
    pub range_max_days: i64,
    /// Result cap sent with every document-store query.
    pub find_limit: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            range_default_days: 7,
            range_max_days: 366,
            find_limit: 500,
        }
    }
}

impl AggregationSettings {
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_range_default_days(mut self, days: i64) -> Self {
        self.range_default_days = days;
        self
    }

    pub fn with_range_max_days(mut self, days: i64) -> Self {
        self.range_max_days = days;
        self
    }

    pub fn with_find_limit(mut self, limit: usize) -> Self {
        self.find_limit = limit;
        self
    }

    /// Fan-out limit, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

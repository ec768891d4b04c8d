//! Aggregation configuration from TOML (`[aggregation]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAggregationConfig {
    /// Concurrent upstream calls per traversal level or date range (default: 4)
    pub max_concurrency: usize,
    /// Days covered by a range summary when no bounds are given (default: 7)
    pub range_default_days: i64,
    /// Longest range a summary may cover (default: 366)
    pub range_max_days: i64,
}

impl Default for FileAggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            range_default_days: 7,
            range_max_days: 366,
        }
    }
}

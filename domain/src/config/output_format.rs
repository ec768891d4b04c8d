//! Output format value object

use serde::{Deserialize, Serialize};

/// How tool results are rendered on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored summary followed by the pretty-printed payload
    #[default]
    Pretty,
    /// The response envelope as a single JSON document
    Json,
}

//! Document store port
//!
//! Single-request filtered queries against the service's backing document
//! store. Only usable with complete [`StoreCredentials`](crate::config::StoreCredentials).

use async_trait::async_trait;
use marvin_domain::{Selector, TaskDocument};
use thiserror::Error;

/// Endpoint label used in results and error reports
pub const FIND_ENDPOINT: &str = "CouchDB _find";

/// Errors from the document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document store credentials not configured: missing {}", .missing.join(", "))]
    NotConfigured { missing: Vec<String> },

    #[error("CouchDB _find returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request to CouchDB _find failed: {0}")]
    Transport(String),

    #[error("Could not decode CouchDB _find response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn endpoint(&self) -> &str {
        FIND_ENDPOINT
    }
}

/// Port for document-store queries
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Run `selector`, returning at most `limit` documents.
    ///
    /// `fields` is the wire projection; `None` returns whole documents.
    async fn find(
        &self,
        selector: &Selector,
        fields: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<TaskDocument>, StoreError>;
}

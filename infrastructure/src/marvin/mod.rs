//! HTTP adapters for the task-management service
//!
//! - [`MarvinApiClient`]: the REST API, implementing
//!   [`TaskServicePort`](marvin_application::TaskServicePort)
//! - [`CouchDbStore`]: the CouchDB `_find` endpoint, implementing
//!   [`DocumentStorePort`](marvin_application::DocumentStorePort)
//!
//! Neither adapter retries. Errors carry the endpoint that was attempted.

pub mod client;
pub mod store;

pub use client::MarvinApiClient;
pub use store::CouchDbStore;

use thiserror::Error;

/// Longest upstream error body kept in an error message
pub(crate) const MAX_ERROR_BODY: usize = 200;

/// Errors raised while constructing an HTTP adapter
#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("{0} contains characters that are not allowed in an HTTP header")]
    InvalidHeader(&'static str),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

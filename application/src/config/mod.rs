//! Application-level configuration.
//!
//! Explicit values threaded into adapter and use case constructors:
//!
//! - [`StoreCredentials`]: document-store access, gates the store path
//! - [`AggregationSettings`]: fan-out, range defaults and query caps

pub mod aggregation_settings;
pub mod store_credentials;

pub use aggregation_settings::AggregationSettings;
pub use store_credentials::{STORE_SETTING_NAMES, StoreCredentials};

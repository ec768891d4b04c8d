//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod aggregation;
mod api;
mod output;
mod store;

pub use aggregation::FileAggregationConfig;
pub use api::{DEFAULT_BASE_URL, FileApiConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use store::FileStoreConfig;

use marvin_application::{AggregationSettings, StoreCredentials};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MASK: &str = "***";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("api.api_key cannot be empty")]
    EmptyApiKey,

    #[error("no API key configured; set AMAZING_MARVIN_API_KEY or api.api_key")]
    MissingApiKey,

    #[error("api.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("aggregation.max_concurrency cannot be 0")]
    InvalidConcurrency,

    #[error("aggregation.range_default_days must be at least 1")]
    InvalidRangeDays,

    #[error("aggregation.range_max_days must be at least range_default_days")]
    InvalidRangeLimit,

    #[error("store.find_limit cannot be 0")]
    InvalidFindLimit,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// REST API settings
    pub api: FileApiConfig,
    /// Document store settings
    pub store: FileStoreConfig,
    /// Traversal and range fan-out
    pub aggregation: FileAggregationConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self
            .api
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyApiKey);
        }

        // Timeout of 0 seconds doesn't make sense
        if self.api.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.aggregation.max_concurrency == 0 {
            return Err(ConfigValidationError::InvalidConcurrency);
        }

        if self.aggregation.range_default_days < 1 {
            return Err(ConfigValidationError::InvalidRangeDays);
        }

        if self.aggregation.range_max_days < self.aggregation.range_default_days {
            return Err(ConfigValidationError::InvalidRangeLimit);
        }

        if self.store.find_limit == 0 {
            return Err(ConfigValidationError::InvalidFindLimit);
        }

        Ok(())
    }

    /// The API key, required before any REST call is made
    pub fn require_api_key(&self) -> Result<&str, ConfigValidationError> {
        self.api.api_key().ok_or(ConfigValidationError::MissingApiKey)
    }

    pub fn store_credentials(&self) -> StoreCredentials {
        self.store.credentials()
    }

    pub fn aggregation_settings(&self) -> AggregationSettings {
        AggregationSettings::default()
            .with_max_concurrency(self.aggregation.max_concurrency)
            .with_range_default_days(self.aggregation.range_default_days)
            .with_range_max_days(self.aggregation.range_max_days)
            .with_find_limit(self.store.find_limit)
    }

    /// Copy with every secret replaced by `***`, for display
    pub fn masked(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| MASK.to_string());
        let mut masked = self.clone();
        masked.api.api_key = mask(&self.api.api_key);
        masked.api.full_access_token = mask(&self.api.full_access_token);
        masked.store.password = mask(&self.store.password);
        masked
    }
}

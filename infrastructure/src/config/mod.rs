//! Configuration loading for marvin-bridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AMAZING_MARVIN_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./marvin.toml` or `./.marvin.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/marvin-bridge/config.toml`
//! 5. Fallback: `~/.config/marvin-bridge/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, FileAggregationConfig, FileApiConfig, FileConfig,
    FileOutputConfig, FileOutputFormat, FileStoreConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX, env_key};

//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Prefix shared by every environment setting
pub const ENV_PREFIX: &str = "AMAZING_MARVIN_";

const APP_DIR: &str = "marvin-bridge";
const PROJECT_FILES: [&str; 2] = ["marvin.toml", ".marvin.toml"];

/// Environment suffixes (after [`ENV_PREFIX`]) and the config keys they set
const ENV_KEYS: [(&str, &str); 12] = [
    ("api_key", "api.api_key"),
    ("full_access_token", "api.full_access_token"),
    ("base_url", "api.base_url"),
    ("timeout_seconds", "api.timeout_seconds"),
    ("db_uri", "store.uri"),
    ("db_name", "store.database"),
    ("db_user", "store.user"),
    ("db_password", "store.password"),
    ("find_limit", "store.find_limit"),
    ("max_concurrency", "aggregation.max_concurrency"),
    ("range_default_days", "aggregation.range_default_days"),
    ("range_max_days", "aggregation.range_max_days"),
];

/// Map a lowercased environment suffix to its config key
pub fn env_key(suffix: &str) -> Option<&'static str> {
    ENV_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(suffix))
        .map(|(_, key)| *key)
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AMAZING_MARVIN_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./marvin.toml` or `./.marvin.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/marvin-bridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::file_figment(config_path)
            .merge(Self::env())
            .extract()
            .map_err(Box::new)
    }

    /// Defaults plus environment, skipping every file (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env())
            .extract()
            .map_err(Box::new)
    }

    fn file_figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).filter_map(|suffix| env_key(suffix.as_str()).map(Into::into))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/marvin-bridge/config.toml if set,
    /// otherwise falls back to ~/.config/marvin-bridge/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|filename| dir.join(filename))
            .find(|path| path.exists())
    }

    /// Environment variables that are currently set, by name
    pub fn env_sources() -> Vec<String> {
        ENV_KEYS
            .iter()
            .map(|(suffix, _)| format!("{}{}", ENV_PREFIX, suffix.to_uppercase()))
            .filter(|name| std::env::var_os(name).is_some())
            .collect()
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        let env = Self::env_sources();
        if env.is_empty() {
            println!("  [     ] Env:     {}*", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env.join(", "));
        }

        if let Some(path) = explicit {
            println!("  [FOUND] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./marvin.toml or ./.marvin.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

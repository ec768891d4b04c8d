//! REST API configuration from TOML (`[api]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://serv.amazingmarvin.com/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the REST API (default: "https://serv.amazingmarvin.com/api")
    pub base_url: String,
    /// Limited-access API token, sent as `X-API-Token`
    pub api_key: Option<String>,
    /// Full-access token, sent as `X-Full-Access-Token` by the document tools
    pub full_access_token: Option<String>,
    /// Per-request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            full_access_token: None,
            timeout_seconds: 30,
        }
    }
}

impl FileApiConfig {
    /// The API key, if set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// The full-access token, if set and non-blank
    pub fn full_access_token(&self) -> Option<&str> {
        self.full_access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

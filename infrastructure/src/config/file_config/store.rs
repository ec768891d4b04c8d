//! Document store configuration from TOML (`[store]` section)

use marvin_application::StoreCredentials;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// CouchDB server URI
    pub uri: Option<String>,
    /// Database name
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Maximum documents per `_find` query (default: 500)
    pub find_limit: usize,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: None,
            user: None,
            password: None,
            find_limit: 500,
        }
    }
}

impl FileStoreConfig {
    pub fn credentials(&self) -> StoreCredentials {
        StoreCredentials {
            uri: self.uri.clone(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_store_section_reports_missing() {
        let toml_str = r#"
[store]
uri = "https://couch.example.com"
database = "marvin"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let creds = config.store.credentials();

        assert_eq!(config.store.find_limit, 500);
        assert_eq!(
            creds.missing_settings(),
            vec!["AMAZING_MARVIN_DB_USER", "AMAZING_MARVIN_DB_PASSWORD"]
        );
    }
}

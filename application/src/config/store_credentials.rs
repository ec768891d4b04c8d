//! Document-store credentials.
//!
//! [`StoreCredentials`] is built once from the loaded configuration and
//! passed into the store adapter and the query use case. The store path is
//! only available when all four settings are present.

use serde::{Deserialize, Serialize};

/// Environment names of the four store settings, in reporting order
pub const STORE_SETTING_NAMES: [&str; 4] = [
    "AMAZING_MARVIN_DB_URI",
    "AMAZING_MARVIN_DB_NAME",
    "AMAZING_MARVIN_DB_USER",
    "AMAZING_MARVIN_DB_PASSWORD",
];

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCredentials {
    pub uri: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("uri", &self.uri)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl StoreCredentials {
    pub fn new(
        uri: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: Some(uri.into()),
            database: Some(database.into()),
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// Names of the settings that are absent or blank
    pub fn missing_settings(&self) -> Vec<String> {
        [&self.uri, &self.database, &self.user, &self.password]
            .into_iter()
            .zip(STORE_SETTING_NAMES)
            .filter(|(value, _)| !present(value))
            .map(|(_, name)| name.to_string())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_settings().is_empty()
    }

    /// `{uri}/{database}/_find`, or `None` while incomplete
    pub fn find_url(&self) -> Option<String> {
        match (&self.uri, &self.database) {
            (Some(uri), Some(database)) if self.is_complete() => Some(format!(
                "{}/{}/_find",
                uri.trim_end_matches('/'),
                database
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_credentials() {
        let creds = StoreCredentials::new("https://db.example.com/", "marvin", "u", "p");
        assert!(creds.is_complete());
        assert_eq!(
            creds.find_url().as_deref(),
            Some("https://db.example.com/marvin/_find")
        );
    }

    #[test]
    fn test_missing_settings_named_in_order() {
        let creds = StoreCredentials {
            uri: Some("https://db.example.com".to_string()),
            user: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            creds.missing_settings(),
            vec![
                "AMAZING_MARVIN_DB_NAME".to_string(),
                "AMAZING_MARVIN_DB_USER".to_string(),
                "AMAZING_MARVIN_DB_PASSWORD".to_string(),
            ]
        );
        assert!(creds.find_url().is_none());
    }

    #[test]
    fn test_debug_masks_password() {
        let creds = StoreCredentials::new("uri", "db", "user", "secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }
}

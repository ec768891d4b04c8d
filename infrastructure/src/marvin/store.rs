//! CouchDB `_find` adapter
//!
//! Posts `{selector, limit, fields?}` to `{uri}/{database}/_find` with basic
//! auth and returns the `docs` array.

use super::{ClientBuildError, MAX_ERROR_BODY};
use async_trait::async_trait;
use marvin_application::{DocumentStorePort, FIND_ENDPOINT, StoreCredentials, StoreError};
use marvin_domain::core::string::truncate;
use marvin_domain::{Selector, TaskDocument};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Document store reached through CouchDB's Mango query endpoint
#[derive(Debug, Clone)]
pub struct CouchDbStore {
    http: reqwest::Client,
    credentials: StoreCredentials,
}

impl CouchDbStore {
    pub fn new(credentials: StoreCredentials, timeout: Duration) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, credentials })
    }
}

#[async_trait]
impl DocumentStorePort for CouchDbStore {
    async fn find(
        &self,
        selector: &Selector,
        fields: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<TaskDocument>, StoreError> {
        let (Some(url), Some(user)) = (self.credentials.find_url(), self.credentials.user.as_deref())
        else {
            return Err(StoreError::NotConfigured {
                missing: self.credentials.missing_settings(),
            });
        };

        let body = find_body(selector, fields, limit);
        debug!(endpoint = FIND_ENDPOINT, %url, limit, "POST");

        let response = self
            .http
            .post(&url)
            .basic_auth(user, self.credentials.password.as_deref())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = FIND_ENDPOINT, error = %e, "Request failed");
                StoreError::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            warn!(endpoint = FIND_ENDPOINT, status, "Document store returned an error status");
            return Err(StoreError::Http {
                status,
                message: truncate(text.trim(), MAX_ERROR_BODY),
            });
        }

        let documents = parse_docs(&text)?;
        debug!(endpoint = FIND_ENDPOINT, count = documents.len(), "Fetched documents");
        Ok(documents)
    }
}

/// Request body for `_find`. `fields` is omitted when `None`.
fn find_body(selector: &Selector, fields: Option<&[String]>, limit: usize) -> Value {
    let mut body = json!({
        "selector": selector,
        "limit": limit,
    });
    if let Some(fields) = fields {
        body["fields"] = json!(fields);
    }
    body
}

fn parse_docs(text: &str) -> Result<Vec<TaskDocument>, StoreError> {
    let mut value: Value =
        serde_json::from_str(text).map_err(|e| StoreError::Decode(e.to_string()))?;
    match value.get_mut("docs").map(Value::take) {
        Some(docs @ Value::Array(_)) => Ok(TaskDocument::from_array(docs)),
        Some(_) => Err(StoreError::Decode("`docs` is not an array".to_string())),
        None => Err(StoreError::Decode("response has no `docs` field".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marvin_domain::{LabelResolution, TaskFilter, build_selector};

    #[test]
    fn test_find_body_with_fields() {
        let filter = TaskFilter::new();
        let selector = build_selector(&filter, &LabelResolution::NotRequested).unwrap();
        let fields = vec!["_id".to_string(), "title".to_string()];

        let body = find_body(&selector, Some(fields.as_slice()), 500);

        assert_eq!(body["limit"], 500);
        assert_eq!(body["fields"], json!(["_id", "title"]));
        assert_eq!(body["selector"]["db"], "Tasks");
    }

    #[test]
    fn test_find_body_without_fields() {
        let selector = build_selector(&TaskFilter::new(), &LabelResolution::NotRequested).unwrap();
        let body = find_body(&selector, None, 10);
        assert!(body.get("fields").is_none());
    }

    #[test]
    fn test_parse_docs() {
        let docs = parse_docs(r#"{"docs": [{"_id": "a"}, {"_id": "b"}], "bookmark": "x"}"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id(), Some("a"));
    }

    #[test]
    fn test_parse_docs_rejects_missing_field() {
        assert!(matches!(parse_docs(r#"{"rows": []}"#), Err(StoreError::Decode(_))));
        assert!(matches!(parse_docs("not json"), Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_incomplete_credentials_fail_without_request() {
        let store = CouchDbStore::new(StoreCredentials::default(), Duration::from_secs(5)).unwrap();
        let selector = build_selector(&TaskFilter::new(), &LabelResolution::NotRequested).unwrap();

        let err = store.find(&selector, None, 10).await.unwrap_err();

        match err {
            StoreError::NotConfigured { missing } => assert_eq!(missing.len(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

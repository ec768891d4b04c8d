//! REST API client
//!
//! Every request is authenticated with the `X-API-Token` header; document
//! endpoints additionally send `X-Full-Access-Token` and fail locally when
//! no such token was configured. A 404 becomes [`ServiceError::NotFound`] so
//! callers can treat containers without a children endpoint as empty; an
//! empty body (204) is an empty list for reads and an empty object for
//! writes.

use super::{ClientBuildError, MAX_ERROR_BODY};
use async_trait::async_trait;
use chrono::NaiveDate;
use marvin_application::{ServiceError, TaskServicePort, TaskWriterPort, endpoints};
use marvin_domain::core::string::truncate;
use marvin_domain::{DocSetter, Label, NewProject, NewTask, TaskDocument, format_date};
use reqwest::RequestBuilder;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

const API_TOKEN_HEADER: &str = "X-API-Token";
const FULL_ACCESS_HEADER: &str = "X-Full-Access-Token";

/// Client for the service's REST API
#[derive(Debug, Clone)]
pub struct MarvinApiClient {
    http: reqwest::Client,
    base_url: String,
    full_access_token: Option<HeaderValue>,
}

impl MarvinApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let mut token = HeaderValue::from_str(api_key)
            .map_err(|_| ClientBuildError::InvalidHeader("API key"))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            full_access_token: None,
        })
    }

    /// Enable the document endpoints
    pub fn with_full_access_token(mut self, token: &str) -> Result<Self, ClientBuildError> {
        let mut token = HeaderValue::from_str(token)
            .map_err(|_| ClientBuildError::InvalidHeader("Full-access token"))?;
        token.set_sensitive(true);
        self.full_access_token = Some(token);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_full_access(&self) -> bool {
        self.full_access_token.is_some()
    }

    fn url(&self, endpoint: &str) -> String {
        endpoint_url(&self.base_url, endpoint)
    }

    /// The full-access header value, checked before anything is sent
    fn full_access(&self, endpoint: &'static str) -> Result<HeaderValue, ServiceError> {
        self.full_access_token
            .clone()
            .ok_or_else(|| ServiceError::FullAccessRequired {
                endpoint: endpoint.to_string(),
            })
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.send().await.map_err(|e| transport(endpoint, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport(endpoint, e))?;

        check_status(endpoint, status, &body)?;
        Ok(body)
    }

    async fn get(
        &self,
        endpoint: &'static str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ServiceError> {
        debug!(endpoint, ?query, "GET");
        let body = self
            .send(endpoint, self.http.get(self.url(endpoint)).query(query))
            .await?;
        Ok(parse_body(endpoint, &body)?.unwrap_or(Value::Null))
    }

    async fn post(&self, endpoint: &'static str, payload: &Value) -> Result<Value, ServiceError> {
        debug!(endpoint, "POST");
        let body = self
            .send(endpoint, self.http.post(self.url(endpoint)).json(payload))
            .await?;
        Ok(parse_body(endpoint, &body)?.unwrap_or_else(|| json!({})))
    }

    async fn post_full_access(&self, endpoint: &'static str, payload: &Value) -> Result<Value, ServiceError> {
        let token = self.full_access(endpoint)?;
        debug!(endpoint, "POST (full access)");
        let request = self
            .http
            .post(self.url(endpoint))
            .header(FULL_ACCESS_HEADER, token)
            .json(payload);
        let body = self.send(endpoint, request).await?;
        Ok(parse_body(endpoint, &body)?.unwrap_or_else(|| json!({})))
    }

    async fn get_documents(
        &self,
        endpoint: &'static str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<TaskDocument>, ServiceError> {
        let value = self.get(endpoint, query).await?;
        let documents = into_documents(endpoint, value)?;
        debug!(endpoint, count = documents.len(), "Fetched documents");
        Ok(documents)
    }
}

#[async_trait]
impl TaskServicePort for MarvinApiClient {
    async fn categories(&self) -> Result<Vec<TaskDocument>, ServiceError> {
        self.get_documents(endpoints::CATEGORIES, &[]).await
    }

    async fn labels(&self) -> Result<Vec<Label>, ServiceError> {
        let value = self.get(endpoints::LABELS, &[]).await?;
        into_labels(endpoints::LABELS, value)
    }

    async fn children(&self, parent_id: &str) -> Result<Vec<TaskDocument>, ServiceError> {
        self.get_documents(endpoints::CHILDREN, &[("parentId", parent_id.to_string())])
            .await
    }

    async fn today_items(&self, date: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError> {
        self.get_documents(endpoints::TODAY_ITEMS, &date_query(date))
            .await
    }

    async fn due_items(&self) -> Result<Vec<TaskDocument>, ServiceError> {
        self.get_documents(endpoints::DUE_ITEMS, &[]).await
    }

    async fn done_items(&self, date: Option<NaiveDate>) -> Result<Vec<TaskDocument>, ServiceError> {
        self.get_documents(endpoints::DONE_ITEMS, &date_query(date))
            .await
    }

    async fn goals(&self) -> Result<Vec<Value>, ServiceError> {
        let value = self.get(endpoints::GOALS, &[]).await?;
        into_values(endpoints::GOALS, value)
    }

    async fn account(&self) -> Result<Value, ServiceError> {
        let value = self.get(endpoints::ME, &[]).await?;
        Ok(if value.is_null() { json!({}) } else { value })
    }

    async fn test_connection(&self) -> Result<String, ServiceError> {
        let body = self
            .send(endpoints::TEST, self.http.post(self.url(endpoints::TEST)))
            .await?;
        let status = body.trim().to_string();
        info!(status = %status, "API connection test");
        Ok(status)
    }
}

#[async_trait]
impl TaskWriterPort for MarvinApiClient {
    async fn create_task(&self, task: &NewTask) -> Result<Value, ServiceError> {
        self.post(endpoints::ADD_TASK, &task.to_body()).await
    }

    async fn mark_done(&self, item_id: &str, timezone_offset: i64) -> Result<Value, ServiceError> {
        self.post(
            endpoints::MARK_DONE,
            &json!({"itemId": item_id, "timeZoneOffset": timezone_offset}),
        )
        .await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Value, ServiceError> {
        self.post(endpoints::ADD_PROJECT, &project.to_body()).await
    }

    async fn read_doc(&self, item_id: &str) -> Result<Value, ServiceError> {
        let token = self.full_access(endpoints::DOC)?;
        debug!(endpoint = endpoints::DOC, item_id, "GET (full access)");
        let request = self
            .http
            .get(self.url(endpoints::DOC))
            .query(&[("id", item_id)])
            .header(FULL_ACCESS_HEADER, token);
        let body = self.send(endpoints::DOC, request).await?;
        Ok(parse_body(endpoints::DOC, &body)?.unwrap_or_else(|| json!({})))
    }

    async fn update_doc(&self, item_id: &str, setters: &[DocSetter]) -> Result<Value, ServiceError> {
        self.post_full_access(
            endpoints::DOC_UPDATE,
            &json!({"itemId": item_id, "setters": setters}),
        )
        .await
    }

    async fn create_doc(&self, document: &Value) -> Result<Value, ServiceError> {
        self.post_full_access(endpoints::DOC_CREATE, document).await
    }

    async fn delete_doc(&self, item_id: &str) -> Result<Value, ServiceError> {
        self.post_full_access(endpoints::DOC_DELETE, &json!({"itemId": item_id}))
            .await
    }
}

fn transport(endpoint: &str, error: reqwest::Error) -> ServiceError {
    let error = ServiceError::Transport {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    };
    warn!(endpoint, error = %error, "Request failed");
    error
}

/// `{base_url}{endpoint}` with exactly one slash between them
fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn date_query(date: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    date.map(|d| vec![("date", format_date(d))]).unwrap_or_default()
}

fn check_status(endpoint: &str, status: u16, body: &str) -> Result<(), ServiceError> {
    match status {
        200..=299 => Ok(()),
        404 => {
            debug!(endpoint, "Endpoint returned 404");
            Err(ServiceError::NotFound {
                endpoint: endpoint.to_string(),
            })
        }
        _ => {
            let error = ServiceError::Http {
                endpoint: endpoint.to_string(),
                status,
                message: truncate(body.trim(), MAX_ERROR_BODY),
            };
            warn!(endpoint, status, "Upstream returned an error status");
            Err(error)
        }
    }
}

/// `None` for an empty body
fn parse_body(endpoint: &str, body: &str) -> Result<Option<Value>, ServiceError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| ServiceError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}

fn into_documents(endpoint: &str, value: Value) -> Result<Vec<TaskDocument>, ServiceError> {
    match value {
        Value::Array(items) => Ok(TaskDocument::from_array(Value::Array(items))),
        Value::Null => Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        other => Err(ServiceError::Decode {
            endpoint: endpoint.to_string(),
            message: format!("expected a JSON array, got {}", kind_of(&other)),
        }),
    }
}

/// Labels without an identifier are dropped
fn into_labels(endpoint: &str, value: Value) -> Result<Vec<Label>, ServiceError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => return Ok(Vec::new()),
        other => {
            return Err(ServiceError::Decode {
                endpoint: endpoint.to_string(),
                message: format!("expected a JSON array, got {}", kind_of(&other)),
            });
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Label>(item).ok())
        .collect())
}

fn into_values(endpoint: &str, value: Value) -> Result<Vec<Value>, ServiceError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        other => Err(ServiceError::Decode {
            endpoint: endpoint.to_string(),
            message: format!("expected a JSON array, got {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

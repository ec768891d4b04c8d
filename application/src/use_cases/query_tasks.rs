//! Query Tasks use case
//!
//! The reconciliation layer. [`QueryTasksUseCase::execute`] serves a
//! [`TaskFilter`] from the document store in one query;
//! [`QueryTasksUseCase::find_tasks`] picks the store path when credentials are
//! complete and otherwise walks the tree and applies the same predicates in
//! memory. Both end in the same normalization, so the result shape does not
//! depend on the path.

use crate::config::{AggregationSettings, StoreCredentials};
use crate::ports::document_store::{DocumentStorePort, FIND_ENDPOINT, StoreError};
use crate::ports::task_service::{ServiceError, TaskServicePort};
use crate::use_cases::aggregate_tasks::AggregateTasksUseCase;
use crate::use_cases::shared::resolve_label;
use marvin_domain::{
    AggregationResult, DomainError, FieldProjection, FilterEvaluator, LabelResolution, QuerySource,
    TaskFilter, build_selector, normalize_documents,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while querying tasks
#[derive(Error, Debug)]
pub enum QueryTasksError {
    #[error(
        "Document store credentials not configured. Set {} to use query_tasks. Use get_all_tasks as a fallback.",
        .missing.join(", ")
    )]
    NotConfigured { missing: Vec<String> },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl QueryTasksError {
    /// The endpoint that was being attempted
    pub fn endpoint(&self) -> &str {
        match self {
            QueryTasksError::NotConfigured { .. } | QueryTasksError::Domain(_) => FIND_ENDPOINT,
            QueryTasksError::Store(e) => e.endpoint(),
            QueryTasksError::Service(e) => e.endpoint(),
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, QueryTasksError::NotConfigured { .. })
    }
}

/// Use case for filtered task queries over either access path
pub struct QueryTasksUseCase<S, D>
where
    S: TaskServicePort + 'static,
    D: DocumentStorePort + 'static,
{
    service: Arc<S>,
    store: Arc<D>,
    credentials: StoreCredentials,
    settings: AggregationSettings,
    traversal: AggregateTasksUseCase<S>,
}

impl<S, D> QueryTasksUseCase<S, D>
where
    S: TaskServicePort + 'static,
    D: DocumentStorePort + 'static,
{
    pub fn new(
        service: Arc<S>,
        store: Arc<D>,
        credentials: StoreCredentials,
        settings: AggregationSettings,
    ) -> Self {
        let traversal = AggregateTasksUseCase::new(Arc::clone(&service), settings);
        Self {
            service,
            store,
            credentials,
            settings,
            traversal,
        }
    }

    pub fn store_available(&self) -> bool {
        self.credentials.is_complete()
    }

    /// Serve `filter` from the document store.
    ///
    /// Fails with [`QueryTasksError::NotConfigured`] before any upstream call
    /// when a store setting is missing. An unknown label returns an empty
    /// result without querying the store.
    pub async fn execute(&self, filter: &TaskFilter) -> Result<AggregationResult, QueryTasksError> {
        let missing = self.credentials.missing_settings();
        if !missing.is_empty() {
            debug!(?missing, "Document store path unavailable");
            return Err(QueryTasksError::NotConfigured { missing });
        }

        let (label, mut api_calls) = resolve_label(self.service.as_ref(), filter.label.as_deref()).await?;
        if let LabelResolution::NotFound(name) = &label {
            info!(label = %name, "Label not found, skipping store query");
            return Ok(AggregationResult::label_not_found(
                QuerySource::DocumentStore,
                name,
                api_calls,
            ));
        }

        let selector = build_selector(filter, &label)?;
        let wire_fields = filter.fields.as_ref().map(FieldProjection::store_fields);
        debug!(clauses = selector.clause_count(), "Querying document store");

        let documents = self
            .store
            .find(&selector, wire_fields.as_deref(), self.settings.find_limit)
            .await
            .inspect_err(|e| warn!(endpoint = FIND_ENDPOINT, error = %e, "Document store query failed"))?;
        api_calls += 1;

        let normalized = normalize_documents(documents, filter.fields.as_ref());
        let summary = format!(
            "Retrieved {} tasks via CouchDB{}",
            normalized.tasks.len(),
            describe_filters(filter)
        );
        info!(tasks = normalized.tasks.len(), api_calls, "Store query complete");

        Ok(
            AggregationResult::new(QuerySource::DocumentStore, normalized, api_calls)
                .with_label_filter(filter.label.as_deref())
                .with_filters(filter.describe())
                .with_summary(summary),
        )
    }

    /// Serve `filter` from whichever path is available.
    pub async fn find_tasks(&self, filter: &TaskFilter) -> Result<AggregationResult, QueryTasksError> {
        if self.store_available() {
            return self.execute(filter).await;
        }
        info!("Store credentials incomplete, falling back to tree traversal");
        self.traverse_and_filter(filter).await
    }

    async fn traverse_and_filter(&self, filter: &TaskFilter) -> Result<AggregationResult, QueryTasksError> {
        let roots = self.service.categories().await?;
        let run = self.traversal.walk(&roots, filter.label.as_deref()).await?;
        let api_calls = run.api_calls + 1;

        if let LabelResolution::NotFound(name) = &run.label {
            return Ok(AggregationResult::label_not_found(
                QuerySource::TreeTraversal,
                name,
                api_calls,
            ));
        }

        let matching = FilterEvaluator::new(filter, &run.label).apply(run.output.tasks);
        let normalized = normalize_documents(matching, filter.fields.as_ref());
        let skipped = run.output.skipped;

        let mut summary = format!(
            "Retrieved {} tasks via tree traversal{}",
            normalized.tasks.len(),
            describe_filters(filter)
        );
        if !skipped.is_empty() {
            summary.push_str(&format!(" ({} containers skipped)", skipped.len()));
        }

        Ok(
            AggregationResult::new(QuerySource::TreeTraversal, normalized, api_calls)
                .with_label_filter(filter.label.as_deref())
                .with_filters(filter.describe())
                .with_skipped(skipped)
                .with_summary(summary),
        )
    }
}

fn describe_filters(filter: &TaskFilter) -> String {
    let filters = filter.describe();
    if filters.is_empty() {
        String::new()
    } else {
        format!(" ({})", filters.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{MockDocumentStore, MockTaskService, date};
    use serde_json::json;

    fn credentials() -> StoreCredentials {
        StoreCredentials::new("https://db.example.com", "marvin", "user", "secret")
    }

    fn use_case(
        service: MockTaskService,
        store: MockDocumentStore,
        credentials: StoreCredentials,
    ) -> (
        Arc<MockTaskService>,
        Arc<MockDocumentStore>,
        QueryTasksUseCase<MockTaskService, MockDocumentStore>,
    ) {
        let service = Arc::new(service);
        let store = Arc::new(store);
        let use_case = QueryTasksUseCase::new(
            Arc::clone(&service),
            Arc::clone(&store),
            credentials,
            AggregationSettings::default(),
        );
        (service, store, use_case)
    }

    fn store_docs() -> MockDocumentStore {
        MockDocumentStore::new(json!([
            {"_id": "t1", "title": "Write report", "type": "task", "db": "Tasks"},
            {"_id": "p1", "title": "Work", "type": "project", "db": "Tasks"},
            {"_id": "c1", "title": "Home", "type": "category", "db": "Tasks"},
            {"_id": "t2", "title": "Call mom", "db": "Tasks"}
        ]))
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_call() {
        let (service, store, use_case) =
            use_case(MockTaskService::new(), store_docs(), StoreCredentials::default());

        let err = use_case
            .execute(&TaskFilter::new().with_label("Urgent"))
            .await
            .unwrap_err();

        assert!(err.is_not_configured());
        assert_eq!(err.endpoint(), "CouchDB _find");
        let message = err.to_string();
        assert!(message.contains("AMAZING_MARVIN_DB_URI"));
        assert!(message.contains("AMAZING_MARVIN_DB_PASSWORD"));
        assert!(message.contains("get_all_tasks"));
        assert!(service.calls().is_empty());
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_partial_credentials_name_only_missing_settings() {
        let partial = StoreCredentials {
            uri: Some("https://db.example.com".to_string()),
            database: Some("marvin".to_string()),
            user: Some("user".to_string()),
            password: None,
        };
        let (_, _, use_case) = use_case(MockTaskService::new(), store_docs(), partial);

        match use_case.execute(&TaskFilter::new()).await.unwrap_err() {
            QueryTasksError::NotConfigured { missing } => {
                assert_eq!(missing, vec!["AMAZING_MARVIN_DB_PASSWORD".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_store_query_excludes_containers() {
        let (service, store, use_case) = use_case(MockTaskService::new(), store_docs(), credentials());

        let result = use_case.execute(&TaskFilter::new()).await.unwrap();

        assert_eq!(result.task_ids(), vec!["t1", "t2"]);
        assert_eq!(result.source, QuerySource::DocumentStore);
        assert_eq!(result.api_calls_made, 1);
        assert!(service.calls().is_empty());

        let queries = store.queries();
        assert_eq!(queries.len(), 1);
        let (selector, fields, limit) = &queries[0];
        assert_eq!(selector.get("db"), Some(&json!("Tasks")));
        assert_eq!(selector.get("done"), Some(&json!({"$ne": true})));
        assert!(fields.is_none());
        assert_eq!(*limit, 500);
    }

    #[tokio::test]
    async fn test_projection_always_includes_id() {
        let (_, store, use_case) = use_case(MockTaskService::new(), store_docs(), credentials());
        let filter = TaskFilter::new().with_fields(["title"]);

        let result = use_case.execute(&filter).await.unwrap();

        assert_eq!(
            result.fields_returned,
            Some(vec!["_id".to_string(), "title".to_string()])
        );
        for task in &result.tasks {
            assert!(task.id().is_some());
            assert!(task.get("type").is_none());
            assert!(task.get("db").is_none());
        }
        let (_, wire, _) = &store.queries()[0];
        let wire = wire.clone().unwrap();
        assert!(wire.contains(&"_id".to_string()));
        assert!(wire.contains(&"type".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_label_skips_store_query() {
        let service = MockTaskService::new().with_label("l1", "Home");
        let (service, store, use_case) = use_case(service, store_docs(), credentials());

        let result = use_case
            .execute(&TaskFilter::new().with_label("Nonexistent"))
            .await
            .unwrap();

        assert!(result.tasks.is_empty());
        assert_eq!(result.total_tasks, 0);
        assert!(result.summary.contains("No label found matching 'Nonexistent'"));
        assert_eq!(result.api_calls_made, 1);
        assert_eq!(service.calls_to("/labels"), 1);
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_resolved_label_pushed_into_selector() {
        let service = MockTaskService::new().with_label("l-urgent", "Urgent");
        let (_, store, use_case) = use_case(service, store_docs(), credentials());
        let filter = TaskFilter::new()
            .with_label("URGENT")
            .with_due(Some(date("2025-06-13")), Some(date("2025-06-01")), None)
            .starred(true);

        let result = use_case.execute(&filter).await.unwrap();

        assert_eq!(result.api_calls_made, 2);
        assert_eq!(result.label_filter.as_deref(), Some("URGENT"));
        assert!(result.summary.contains("label='URGENT'"));
        let (selector, _, _) = &store.queries()[0];
        assert_eq!(
            selector.get("labelIds"),
            Some(&json!({"$elemMatch": {"$eq": "l-urgent"}}))
        );
        assert_eq!(selector.get("dueDate"), Some(&json!("2025-06-13")));
        assert_eq!(selector.get("isStarred"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_store_errors_name_endpoint() {
        let store = MockDocumentStore::failing(StoreError::Http {
            status: 401,
            message: "unauthorized".to_string(),
        });
        let (_, _, use_case) = use_case(MockTaskService::new(), store, credentials());

        let err = use_case.execute(&TaskFilter::new()).await.unwrap_err();
        assert_eq!(err.endpoint(), "CouchDB _find");
        assert!(err.to_string().contains("401"));
    }

    fn forest() -> MockTaskService {
        MockTaskService::new()
            .with_label("l-urgent", "Urgent")
            .with_categories(json!([{"_id": "root", "type": "category"}]))
            .with_children(
                "root",
                json!([
                    {"_id": "t1", "title": "Write report", "labelIds": ["l-urgent"], "dueDate": "2025-06-10"},
                    {"_id": "t2", "title": "Call mom", "dueDate": "2025-06-20"},
                    {"_id": "t3", "title": "Old", "done": true, "labelIds": ["l-urgent"]},
                    {"_id": "p1", "title": "Work", "type": "project"}
                ]),
            )
            .with_children(
                "p1",
                json!([{"_id": "t4", "title": "Report review", "isStarred": 1, "labelIds": ["l-urgent"]}]),
            )
    }

    #[tokio::test]
    async fn test_find_tasks_falls_back_to_traversal() {
        let (_, store, use_case) = use_case(forest(), store_docs(), StoreCredentials::default());
        let filter = TaskFilter::new().with_label("urgent").containing("REPORT");

        let result = use_case.find_tasks(&filter).await.unwrap();

        assert_eq!(result.source, QuerySource::TreeTraversal);
        assert_eq!(result.task_ids(), vec!["t1", "t4"]);
        // labels + categories + two children fetches
        assert_eq!(result.api_calls_made, 4);
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_find_tasks_fallback_applies_dates_and_projection() {
        let (_, _, use_case) = use_case(forest(), store_docs(), StoreCredentials::default());
        let filter = TaskFilter::new()
            .with_due(None, Some(date("2025-06-15")), None)
            .with_fields(["title"]);

        let result = use_case.find_tasks(&filter).await.unwrap();

        assert_eq!(result.task_ids(), vec!["t1"]);
        assert_eq!(
            result.fields_returned,
            Some(vec!["_id".to_string(), "title".to_string()])
        );
    }

    #[tokio::test]
    async fn test_find_tasks_prefers_store() {
        let (service, store, use_case) = use_case(forest(), store_docs(), credentials());

        let result = use_case.find_tasks(&TaskFilter::new()).await.unwrap();

        assert_eq!(result.source, QuerySource::DocumentStore);
        assert_eq!(store.queries().len(), 1);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_find_tasks_unknown_label_in_fallback() {
        let (service, _, use_case) = use_case(forest(), store_docs(), StoreCredentials::default());

        let result = use_case
            .find_tasks(&TaskFilter::new().with_label("missing"))
            .await
            .unwrap();

        assert!(result.tasks.is_empty());
        assert_eq!(result.source, QuerySource::TreeTraversal);
        assert_eq!(service.calls_to("/children"), 0);
    }
}

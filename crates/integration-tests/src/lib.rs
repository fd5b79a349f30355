//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests against the in-memory store
//! cargo test -p shopfront-integration-tests
//!
//! # Include the PostgreSQL round trip
//! SHOPFRONT_TEST_DATABASE_URL=postgres://localhost/shopfront_test \
//!     cargo test -p shopfront-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `api_catalog` - Product listing and insertion
//! - `api_orders` - Order creation
//! - `api_skus` - SKU insertion and product/SKU correlation
//! - `api_dispatch` - CORS policy, preflight, method and route fallbacks
//! - `store_timeouts` - Per-operation time bounds under a slow store
//! - `postgres_store` - Round trip through the `PostgreSQL` backend

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use shopfront_api::config::ApiConfig;
use shopfront_api::db::{
    Collection, DocumentStore, Filter, MemoryDocumentStore, Projection, Store, StoreError,
};
use shopfront_api::{AppState, app};
use shopfront_core::{DocumentId, RawDocument};
use tower::ServiceExt;

/// A router wired to a substitute store, plus direct access to that store.
pub struct TestContext {
    pub router: Router,
    pub store: Store,
}

impl TestContext {
    /// Router over a fresh in-memory store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Arc::new(MemoryDocumentStore::new()), ApiConfig::in_memory())
    }

    /// Router over `backend`, bounding each store call by `config.store_timeout`.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn DocumentStore>, config: ApiConfig) -> Self {
        let store = Store::new(backend, config.store_timeout);
        let router = app(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request with an optional raw body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap_or_else(|e| panic!("invalid test request: {e}"));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| panic!("router failed: {e}"));

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("unreadable body: {e}"));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Number of documents currently stored in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.store
            .find(collection, &Filter::All, None)
            .await
            .map_or(0, |documents| documents.len())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text()))
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A store call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub collection: Option<Collection>,
    pub filter: Option<Filter>,
}

/// Memory store that records every call it serves.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryDocumentStore,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls served so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `find` calls against `collection`.
    #[must_use]
    pub fn finds_on(&self, collection: Collection) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == "find" && c.collection == Some(collection))
            .collect()
    }

    /// Forget calls recorded so far.
    pub fn reset(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, operation: &'static str, collection: Option<Collection>, filter: Option<&Filter>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                operation,
                collection,
                filter: filter.cloned(),
            });
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn insert_one(
        &self,
        collection: Collection,
        document: RawDocument,
    ) -> Result<DocumentId, StoreError> {
        self.record("insert_one", Some(collection), None);
        self.inner.insert_one(collection, document).await
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.record("insert_many", Some(collection), None);
        self.inner.insert_many(collection, documents).await
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        self.record("find", Some(collection), Some(filter));
        self.inner.find(collection, filter, projection).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.record("ping", None, None);
        self.inner.ping().await
    }
}

/// Memory store whose reads of the given collections each take `delay`.
#[derive(Debug)]
pub struct SlowStore {
    inner: MemoryDocumentStore,
    slow_collections: Vec<Collection>,
    delay: Duration,
}

impl SlowStore {
    #[must_use]
    pub fn new(slow_collections: impl IntoIterator<Item = Collection>, delay: Duration) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            slow_collections: slow_collections.into_iter().collect(),
            delay,
        }
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn insert_one(
        &self,
        collection: Collection,
        document: RawDocument,
    ) -> Result<DocumentId, StoreError> {
        self.inner.insert_one(collection, document).await
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.inner.insert_many(collection, documents).await
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        if self.slow_collections.contains(&collection) {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.find(collection, filter, projection).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Turn a JSON object literal into a document.
///
/// # Panics
///
/// Panics if `value` is not an object.
#[must_use]
pub fn document(value: Value) -> RawDocument {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

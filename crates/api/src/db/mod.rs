//! Document store access.
//!
//! # Collections
//!
//! - `products` - Catalog entries (arbitrary JSON objects, read as `Product`)
//! - `orders` - Purchase records keyed by `ORD-<nanos>`
//! - `skus` - Inventory records correlated to products by `productId`
//!
//! # Backends
//!
//! - [`postgres::PgDocumentStore`] - JSONB rows in the `document` table
//! - [`memory::MemoryDocumentStore`] - process-local, for tests and demos
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopfront-cli -- migrate
//! ```

pub mod document;
pub mod memory;
pub mod postgres;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shopfront_core::{DocumentId, RawDocument};
use thiserror::Error;

use crate::config::{ApiConfig, StoreBackend};

pub use document::{Collection, DocumentStore, Filter, ID_FIELD, Projection};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document with the same `_id` already exists in the collection.
    #[error("duplicate _id in {collection}: {detail}")]
    DuplicateId {
        collection: Collection,
        detail: String,
    },

    /// The document cannot be stored as given.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The operation did not finish within its bound and was cancelled.
    #[error("{operation} on {scope} timed out after {}ms", timeout.as_millis())]
    Timeout {
        operation: &'static str,
        scope: String,
        timeout: Duration,
    },

    /// The backend cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Process-wide handle to the document store.
///
/// Cheaply cloneable. Every operation runs inside its own time bound: the
/// clock starts when the operation is issued and the in-flight work is
/// dropped if the bound expires, so a slow call fails only the request that
/// made it.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl Store {
    /// Wrap a backend with a per-operation time bound.
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Bound applied to each operation.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert one document and return its `_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or the bound expires.
    pub async fn insert_one(
        &self,
        collection: Collection,
        document: RawDocument,
    ) -> Result<DocumentId, StoreError> {
        self.bounded(
            "insert_one",
            collection.as_str(),
            self.backend.insert_one(collection, document),
        )
        .await
    }

    /// Insert a batch of documents in one store call.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or the bound expires.
    pub async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        self.bounded(
            "insert_many",
            collection.as_str(),
            self.backend.insert_many(collection, documents),
        )
        .await
    }

    /// Return every document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the scan cannot run or the bound expires.
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        self.bounded(
            "find",
            collection.as_str(),
            self.backend.find(collection, filter, projection),
        )
        .await
    }

    /// Check that the backend answers within the bound.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend is unreachable or slow.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.bounded("ping", "store", self.backend.ping()).await
    }

    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        scope: &str,
        op: F,
    ) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let started = Instant::now();
        if let Ok(result) = tokio::time::timeout(self.timeout, op).await {
            tracing::debug!(
                operation,
                scope,
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                ok = result.is_ok(),
                "store operation finished"
            );
            result
        } else {
            tracing::warn!(
                operation,
                scope,
                timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                "store operation timed out"
            );
            Err(StoreError::Timeout {
                operation,
                scope: scope.to_string(),
                timeout: self.timeout,
            })
        }
    }
}

/// Connect to the backend selected by configuration and verify it answers.
///
/// # Errors
///
/// Returns `StoreError` if the connection or the initial ping fails.
pub async fn connect(config: &ApiConfig) -> Result<Store, StoreError> {
    let backend: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = tokio::time::timeout(
                config.store_timeout,
                postgres::create_pool(&config.database_url),
            )
            .await
            .map_err(|_| StoreError::Timeout {
                operation: "connect",
                scope: "store".to_string(),
                timeout: config.store_timeout,
            })??;
            Arc::new(PgDocumentStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let store = Store::new(backend, config.store_timeout);
    store.ping().await?;
    Ok(store)
}

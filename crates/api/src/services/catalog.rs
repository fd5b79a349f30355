//! Catalog service.

use shopfront_core::{DocumentId, Product, ProductId, RawDocument};
use tracing::instrument;

use super::{ServiceError, decode, decode_all, encode};
use crate::db::{Collection, Filter, Store};

/// Product catalog operations.
pub struct CatalogService<'a> {
    store: &'a Store,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List every product in store order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the scan fails and
    /// `ServiceError::Decode` if any document is not a valid product. No
    /// partial list is returned.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        let documents = self
            .store
            .find(Collection::Products, &Filter::All, None)
            .await?;
        decode_all(Collection::Products, documents)
    }

    /// Store a client-supplied product document as-is.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the insert fails.
    #[instrument(skip(self, document), fields(keys = document.len()))]
    pub async fn create_product(&self, document: RawDocument) -> Result<DocumentId, ServiceError> {
        let id = self.store.insert_one(Collection::Products, document).await?;
        tracing::info!(document_id = %id, "Product added");
        Ok(id)
    }

    /// Find the first product whose `id` equals `id`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the query fails or the match does not decode.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        let documents = self
            .store
            .find(Collection::Products, &Filter::equals("id", id.as_i64()), None)
            .await?;

        documents
            .into_iter()
            .next()
            .map(|document| decode(Collection::Products, document))
            .transpose()
    }

    /// Insert typed products in a single store call.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if encoding or the bulk insert fails.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn seed_products(&self, products: &[Product]) -> Result<usize, ServiceError> {
        let documents = products.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        let ids = self
            .store
            .insert_many(Collection::Products, documents)
            .await?;
        Ok(ids.len())
    }

    /// Log the catalog contents. Failures are logged and otherwise ignored.
    pub async fn log_catalog_summary(&self) {
        match self.list_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Catalog loaded");
                for product in &products {
                    tracing::debug!(
                        product_id = %product.id,
                        name = %product.name,
                        price = %product.price,
                        "Catalog product"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to summarize catalog"),
        }
    }
}

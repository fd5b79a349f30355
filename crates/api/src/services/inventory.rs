//! Inventory service and product/SKU correlation.
//!
//! Listing SKUs for a product name is a two-phase protocol:
//!
//! 1. **Resolve**: find products whose `name` matches exactly, projecting
//!    only `id`, and collect the ids into an ordered, de-duplicated
//!    candidate set. Records that fail to decode are logged and skipped.
//! 2. **Fetch**: find SKUs whose `productId` is in the candidate set. Any
//!    record that fails to decode fails the whole listing.
//!
//! The phases are separate store calls with no transaction between them, so
//! products inserted or removed in between are not reflected.

use std::collections::BTreeSet;

use chrono::Utc;
use shopfront_core::{DocumentId, NewSku, ProductId, ProductIdRecord, Sku};
use tracing::instrument;

use super::{ServiceError, decode, decode_all, encode};
use crate::db::{Collection, Filter, Projection, Store};

/// SKU operations.
pub struct InventoryService<'a> {
    store: &'a Store,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List every SKU belonging to a product named `product_name`.
    ///
    /// Returns an empty list without querying SKUs when no product matches.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if either phase's query fails and
    /// `ServiceError::Decode` if any fetched SKU is malformed.
    #[instrument(skip(self))]
    pub async fn list_skus_for_product_name(
        &self,
        product_name: &str,
    ) -> Result<Vec<Sku>, ServiceError> {
        let candidates = self.resolve_product_ids(product_name).await?;
        if candidates.is_empty() {
            tracing::debug!(product_name, "No products match; skipping SKU fetch");
            return Ok(Vec::new());
        }

        let filter = Filter::any_of("productId", candidates.iter().map(ProductId::as_i64));
        let documents = self.store.find(Collection::Skus, &filter, None).await?;
        let skus = decode_all(Collection::Skus, documents)?;

        tracing::debug!(
            product_name,
            candidates = candidates.len(),
            skus = skus.len(),
            "Correlated SKUs"
        );
        Ok(skus)
    }

    async fn resolve_product_ids(
        &self,
        product_name: &str,
    ) -> Result<BTreeSet<ProductId>, ServiceError> {
        let documents = self
            .store
            .find(
                Collection::Products,
                &Filter::equals("name", product_name),
                Some(&Projection::only(["id"])),
            )
            .await?;

        let mut ids = BTreeSet::new();
        for document in documents {
            match decode::<ProductIdRecord>(Collection::Products, document) {
                Ok(record) => {
                    ids.insert(record.id);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping product during SKU resolution"),
            }
        }
        Ok(ids)
    }

    /// Stamp and store a new SKU.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the SKU cannot be encoded or stored.
    #[instrument(skip(self, sku), fields(product_id = %sku.product_id))]
    pub async fn create_sku(&self, sku: NewSku) -> Result<DocumentId, ServiceError> {
        let sku = sku.stamp(Utc::now());
        let id = self
            .store
            .insert_one(Collection::Skus, encode(&sku)?)
            .await?;
        tracing::info!(document_id = %id, product_id = %sku.product_id, sku = %sku.sku, "SKU added");
        Ok(id)
    }

    /// Stamp and insert SKUs in a single store call.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if encoding or the bulk insert fails.
    #[instrument(skip(self, skus), fields(count = skus.len()))]
    pub async fn seed_skus(&self, skus: Vec<NewSku>) -> Result<usize, ServiceError> {
        let now = Utc::now();
        let documents = skus
            .into_iter()
            .map(|sku| encode(&sku.stamp(now)))
            .collect::<Result<Vec<_>, _>>()?;
        let ids = self.store.insert_many(Collection::Skus, documents).await?;
        Ok(ids.len())
    }
}

//! Order service.

use chrono::Utc;
use shopfront_core::{Order, OrderId, OrderRequest};
use tracing::instrument;

use super::{ServiceError, encode};
use crate::db::{Collection, Store};

/// Order creation.
pub struct OrderService<'a> {
    store: &'a Store,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Persist a pending order built verbatim from the client request.
    ///
    /// The id is `ORD-` followed by the current Unix time in nanoseconds.
    /// Two orders created in the same tick collide; the store rejects the
    /// second with a duplicate-id error.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the order cannot be encoded or stored.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderId, ServiceError> {
        let now = Utc::now();
        let id = OrderId::from_nanos(now.timestamp_nanos_opt().unwrap_or(i64::MAX));
        let order = Order::pending(id.clone(), request, now);

        self.store
            .insert_one(Collection::Orders, encode(&order)?)
            .await?;

        tracing::info!(
            order_id = %id,
            items = order.items.len(),
            total = %order.total,
            "Order created"
        );
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rust_decimal::Decimal;
    use serde_json::json;
    use shopfront_core::{OrderStatus, ProductId};

    use super::*;
    use crate::db::{Filter, MemoryDocumentStore};

    fn request() -> OrderRequest {
        serde_json::from_value(json!({
            "userDetails": {"name": "Ada", "address": "1 Analytical Way"},
            "items": [{"productId": 1, "quantity": 2, "priceAtTime": 25.99}],
            "subtotal": 51.98,
            "tax": 4.16,
            "total": 56.14
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_order_persists_client_totals() {
        let store = Store::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(1));
        let id = OrderService::new(&store)
            .create_order(request())
            .await
            .unwrap();
        assert!(id.as_str().starts_with("ORD-"));

        let documents = store
            .find(Collection::Orders, &Filter::All, None)
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);

        let order: Order =
            serde_json::from_value(serde_json::Value::Object(documents[0].clone())).unwrap();
        assert_eq!(order.id, id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal, Decimal::new(5198, 2));
        assert_eq!(order.tax, Decimal::new(416, 2));
        assert_eq!(order.total, Decimal::new(5614, 2));
        assert_eq!(order.items[0].product_id, ProductId::new(1));
        assert_eq!(order.shipping_address.street, "1 Analytical Way");
        assert!(order.shipping_address.city.is_empty());
    }

    #[tokio::test]
    async fn test_order_document_uses_order_id_as_store_id() {
        let store = Store::new(Arc::new(MemoryDocumentStore::new()), Duration::from_secs(1));
        let id = OrderService::new(&store)
            .create_order(request())
            .await
            .unwrap();

        let documents = store
            .find(Collection::Orders, &Filter::equals("_id", id.as_str()), None)
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["status"], json!("PENDING"));
    }
}

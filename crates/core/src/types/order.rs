//! Order records and the client payload they are built from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};
use super::status::OrderStatus;

/// One line of an order, priced at the moment the client placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_time: Decimal,
}

/// Shipping address.
///
/// The client supplies a single free-text address which lands in `street`;
/// the structured fields are always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Build an address holding only a free-text street line.
    #[must_use]
    pub fn street_only(street: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            ..Self::default()
        }
    }
}

/// Customer details attached to an order request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserDetails {
    pub name: String,
    pub address: String,
}

/// Order payload submitted by the client.
///
/// Totals are computed client-side and stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub user_details: UserDetails,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A persisted purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub status: OrderStatus,
    pub shipping_address: Address,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from a client request.
    ///
    /// Items and totals are copied as submitted; nothing is checked against
    /// catalog prices or stock.
    #[must_use]
    pub fn pending(id: OrderId, request: OrderRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            shipping_address: Address::street_only(request.user_details.address),
            items: request.items,
            subtotal: request.subtotal,
            tax: request.tax,
            total: request.total,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_request() -> OrderRequest {
        serde_json::from_value(json!({
            "userDetails": {"name": "Ada", "address": "1 Analytical Way"},
            "items": [{"productId": 1, "quantity": 2, "priceAtTime": 25.99}],
            "subtotal": 51.98,
            "tax": 4.16,
            "total": 56.14
        }))
        .unwrap()
    }

    #[test]
    fn test_pending_order_copies_totals_verbatim() {
        let now = Utc::now();
        let order = Order::pending(OrderId::from_nanos(1), sample_request(), now);

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal, Decimal::new(5198, 2));
        assert_eq!(order.tax, Decimal::new(416, 2));
        assert_eq!(order.total, Decimal::new(5614, 2));
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_address_street_only() {
        let order = Order::pending(OrderId::from_nanos(1), sample_request(), Utc::now());

        assert_eq!(order.shipping_address.street, "1 Analytical Way");
        assert!(order.shipping_address.city.is_empty());
        assert!(order.shipping_address.state.is_empty());
        assert!(order.shipping_address.postal_code.is_empty());
        assert!(order.shipping_address.country.is_empty());
    }

    #[test]
    fn test_order_document_layout() {
        let order = Order::pending(OrderId::from_nanos(42), sample_request(), Utc::now());
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["_id"], json!("ORD-42"));
        assert_eq!(value["status"], json!("PENDING"));
        assert_eq!(value["shippingAddress"]["postalCode"], json!(""));
        assert_eq!(value["items"][0]["priceAtTime"], json!(25.99));
        assert_eq!(value["total"], json!(56.14));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_request_without_user_details_is_accepted() {
        let request: OrderRequest = serde_json::from_value(json!({
            "items": [],
            "subtotal": 0,
            "tax": 0,
            "total": 0
        }))
        .unwrap();
        assert!(request.user_details.address.is_empty());
    }

    #[test]
    fn test_request_rejects_non_array_items() {
        let result: Result<OrderRequest, _> = serde_json::from_value(json!({
            "items": "two mice",
            "subtotal": 1,
            "tax": 0,
            "total": 1
        }));
        assert!(result.is_err());
    }
}

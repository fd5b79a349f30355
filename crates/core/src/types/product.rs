//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// An unvalidated JSON object accepted at the API boundary.
///
/// Product inserts are persisted exactly as the client sent them; the only
/// requirement is that the payload is a JSON object. Whether a stored document
/// later decodes as a [`Product`] is checked on read, not on write.
pub type RawDocument = serde_json::Map<String, serde_json::Value>;

/// A catalog entry.
///
/// `id` is assigned by whoever seeds the catalog and is expected, but not
/// guaranteed, to be unique across the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price, written to the wire as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

/// Projection of a product document onto its application id.
///
/// Used by the SKU correlation resolve phase, which asks the store for the
/// `id` field only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProductIdRecord {
    pub id: ProductId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_decodes_with_optional_fields_missing() {
        let product: Product = serde_json::from_value(json!({
            "_id": "5f0c",
            "id": 1,
            "name": "Wireless Mouse",
            "price": 25.99
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(2599, 2));
        assert!(product.description.is_empty());
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_product_price_serializes_as_number() {
        let product = Product {
            id: ProductId::new(3),
            name: "Keyboard".to_string(),
            description: "Mechanical".to_string(),
            price: Decimal::new(4999, 2),
            image: "https://cdn.example.com/kb.png".to_string(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!(49.99));
        assert_eq!(value["id"], json!(3));
    }

    #[test]
    fn test_product_requires_name() {
        let result: Result<Product, _> = serde_json::from_value(json!({"id": 1, "price": 1.0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_id_record_ignores_other_fields() {
        let record: ProductIdRecord =
            serde_json::from_value(json!({"_id": "x", "id": 2})).unwrap();
        assert_eq!(record.id, ProductId::new(2));
    }
}

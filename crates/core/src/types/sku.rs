//! Stock-keeping-unit inventory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Inventory record for one product variant.
///
/// `product_id` correlates to [`Product::id`](super::Product::id) by value
/// only; several SKUs may share one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub product_id: ProductId,
    pub sku: String,
    pub stock_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SKU payload submitted by the client. Timestamps are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSku {
    pub product_id: ProductId,
    pub sku: String,
    #[serde(default)]
    pub stock_quantity: i64,
}

impl NewSku {
    /// Stamp the record with creation and update timestamps.
    #[must_use]
    pub fn stamp(self, now: DateTime<Utc>) -> Sku {
        Sku {
            product_id: self.product_id,
            sku: self.sku,
            stock_quantity: self.stock_quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

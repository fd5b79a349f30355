//! Business logic over the document store.
//!
//! # Services
//!
//! - `catalog` - Product listing, insertion, lookup and seeding
//! - `orders` - Order creation from client payloads
//! - `inventory` - SKU insertion and the two-phase product/SKU correlation
//!
//! Services borrow the [`Store`](crate::db::Store) handle for the duration of
//! one request and hold no state of their own.

pub mod catalog;
pub mod inventory;
pub mod orders;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shopfront_core::RawDocument;
use thiserror::Error;

use crate::db::{Collection, StoreError};

pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use orders::OrderService;

/// Errors raised by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document does not have the expected shape.
    #[error("failed to decode {collection} document: {message}")]
    Decode {
        collection: Collection,
        message: String,
    },

    /// A record could not be turned into a document.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Decode a stored document into `T`.
fn decode<T: DeserializeOwned>(
    collection: Collection,
    document: RawDocument,
) -> Result<T, ServiceError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| ServiceError::Decode {
        collection,
        message: e.to_string(),
    })
}

/// Decode a whole batch; the first failure aborts.
fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    documents: Vec<RawDocument>,
) -> Result<Vec<T>, ServiceError> {
    documents
        .into_iter()
        .map(|document| decode(collection, document))
        .collect()
}

/// Serialize a typed record into a document.
fn encode<T: Serialize>(record: &T) -> Result<RawDocument, ServiceError> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        _ => Err(ServiceError::Encode(serde::ser::Error::custom(
            "record did not serialize to a JSON object",
        ))),
    }
}

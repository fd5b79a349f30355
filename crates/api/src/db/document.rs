//! Document store contract shared by every backend.
//!
//! A backend stores JSON objects in named collections. Each document carries a
//! string `_id`, unique within its collection, which is either supplied by the
//! caller or assigned on insert. Reads return documents in insertion order.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Number, Value};
use shopfront_core::{DocumentId, RawDocument, whole_number};
use uuid::Uuid;

use super::StoreError;

/// Field holding the store-native identifier of every document.
pub const ID_FIELD: &str = "_id";

/// The collections backing the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Orders,
    Skus,
}

impl Collection {
    /// Collection name as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Skus => "skus",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection applied to a collection scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// Documents whose top-level `field` equals `value`.
    Eq { field: String, value: Value },
    /// Documents whose top-level `field` equals one of `values`.
    ///
    /// Callers must not pass an empty set; the correlation layer
    /// short-circuits before reaching the store in that case.
    In { field: String, values: Vec<Value> },
}

impl Filter {
    /// Equality filter on a top-level field.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Set-membership filter on a top-level field.
    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a document satisfies this filter.
    #[must_use]
    pub fn matches(&self, document: &RawDocument) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => document
                .get(field)
                .is_some_and(|candidate| same_value(candidate, value)),
            Self::In { field, values } => document
                .get(field)
                .is_some_and(|candidate| values.iter().any(|v| same_value(candidate, v))),
        }
    }
}

/// JSON equality with numbers compared by value, as jsonb does (`2 = 2.0`).
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (integral(l), integral(r)) {
            (Some(l), Some(r)) => l == r,
            _ => l == r,
        },
        _ => left == right,
    }
}

fn integral(number: &Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().and_then(whole_number))
}

/// Top-level fields to return from a scan. `_id` is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Keep only the named fields (plus `_id`).
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The projected field names, excluding the implicit `_id`.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Apply the projection to a full document.
    #[must_use]
    pub fn apply(&self, document: &RawDocument) -> RawDocument {
        document
            .iter()
            .filter(|(key, _)| key.as_str() == ID_FIELD || self.fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// A document store backend.
///
/// Implementations are shared across all in-flight requests and must be safe
/// for concurrent use. Time bounds are applied by [`Store`](super::Store), not
/// by backends.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert one document and return its `_id`.
    async fn insert_one(
        &self,
        collection: Collection,
        document: RawDocument,
    ) -> Result<DocumentId, StoreError>;

    /// Insert a batch of documents atomically and return their `_id`s in order.
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// Return every document matching `filter`, in insertion order.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Key under which a stored `_id` value is indexed.
///
/// Strings are used verbatim and numbers by their JSON text; other values
/// cannot identify a document.
#[must_use]
pub fn id_key(value: &Value) -> Option<DocumentId> {
    match value {
        Value::String(id) => Some(DocumentId::new(id.clone())),
        Value::Number(id) => Some(DocumentId::new(id.to_string())),
        _ => None,
    }
}

/// Resolve the `_id` of a document about to be inserted.
///
/// A string or numeric `_id` supplied by the caller is kept as-is in the
/// body; otherwise a UUID v4 is assigned and written into the document.
///
/// # Errors
///
/// Returns `StoreError::InvalidDocument` if `_id` is present but neither a
/// string nor a number.
pub fn assign_id(document: &mut RawDocument) -> Result<DocumentId, StoreError> {
    match document.get(ID_FIELD) {
        Some(value) => id_key(value).ok_or_else(|| {
            StoreError::InvalidDocument(format!(
                "{ID_FIELD} must be a string or a number, got {value}"
            ))
        }),
        None => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(DocumentId::new(id))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> RawDocument {
        match value {
            Value::Object(map) => map,
            _ => RawDocument::new(),
        }
    }

    #[test]
    fn test_eq_filter_matches_exact_value() {
        let filter = Filter::equals("name", "Wireless Mouse");
        assert!(filter.matches(&doc(json!({"name": "Wireless Mouse"}))));
        assert!(!filter.matches(&doc(json!({"name": "wireless mouse"}))));
        assert!(!filter.matches(&doc(json!({"title": "Wireless Mouse"}))));
    }

    #[test]
    fn test_in_filter_matches_members_only() {
        let filter = Filter::any_of("productId", [1, 2]);
        assert!(filter.matches(&doc(json!({"productId": 1}))));
        assert!(filter.matches(&doc(json!({"productId": 2}))));
        assert!(!filter.matches(&doc(json!({"productId": 3}))));
        assert!(!filter.matches(&doc(json!({"sku": "X"}))));
    }

    #[test]
    fn test_filters_compare_numbers_by_value() {
        let stored = doc(json!({"id": 2.0, "productId": 3_000_000_000_i64}));

        assert!(Filter::equals("id", 2).matches(&stored));
        assert!(Filter::any_of("productId", [3_000_000_000_i64]).matches(&stored));
        assert!(!Filter::equals("id", 2.5).matches(&stored));
        assert!(!Filter::equals("id", "2").matches(&stored));
    }

    #[test]
    fn test_all_filter_matches_everything() {
        assert!(Filter::All.matches(&RawDocument::new()));
    }

    #[test]
    fn test_projection_keeps_id_field() {
        let projection = Projection::only(["id"]);
        let projected = projection.apply(&doc(json!({
            "_id": "a1",
            "id": 4,
            "name": "Keyboard",
            "price": 10.0
        })));

        assert_eq!(Value::Object(projected), json!({"_id": "a1", "id": 4}));
    }

    #[test]
    fn test_assign_id_generates_uuid() {
        let mut document = doc(json!({"name": "Mouse"}));
        let id = assign_id(&mut document).unwrap();

        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(document.get(ID_FIELD), Some(&json!(id.as_str())));
    }

    #[test]
    fn test_assign_id_keeps_supplied_string() {
        let mut document = doc(json!({"_id": "ORD-1"}));
        assert_eq!(assign_id(&mut document).unwrap().as_str(), "ORD-1");
    }

    #[test]
    fn test_assign_id_keeps_numeric_id_in_body() {
        let mut document = doc(json!({"_id": 12, "name": "Mouse"}));

        assert_eq!(assign_id(&mut document).unwrap().as_str(), "12");
        assert_eq!(document.get(ID_FIELD), Some(&json!(12)));
    }

    #[test]
    fn test_assign_id_rejects_structured_id() {
        for id in [json!({"oid": 1}), json!([1]), json!(null), json!(true)] {
            let mut document = doc(json!({"_id": id}));
            assert!(matches!(
                assign_id(&mut document),
                Err(StoreError::InvalidDocument(_))
            ));
        }
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Products.to_string(), "products");
        assert_eq!(Collection::Orders.as_str(), "orders");
        assert_eq!(Collection::Skus.as_str(), "skus");
    }
}

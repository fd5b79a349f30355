//! In-memory document backend.
//!
//! Selected with `memory://`. Used by the test suites and for running the API
//! without a database; contents are lost when the process exits.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use shopfront_core::{DocumentId, RawDocument};

use super::StoreError;
use super::document::{Collection, DocumentStore, Filter, ID_FIELD, Projection, assign_id, id_key};

/// Documents per collection, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<RawDocument>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

fn contains_id(documents: &[RawDocument], id: &DocumentId) -> bool {
    documents
        .iter()
        .any(|doc| doc.get(ID_FIELD).and_then(id_key).as_ref() == Some(id))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: RawDocument,
    ) -> Result<DocumentId, StoreError> {
        let id = assign_id(&mut document)?;

        let mut collections = self.collections.write().map_err(poisoned)?;
        let documents = collections.entry(collection).or_default();
        if contains_id(documents, &id) {
            return Err(StoreError::DuplicateId {
                collection,
                detail: id.to_string(),
            });
        }
        documents.push(document);

        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<RawDocument>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let mut batch = Vec::with_capacity(documents.len());
        let mut ids = Vec::with_capacity(documents.len());
        let mut seen = HashSet::with_capacity(documents.len());
        for mut document in documents {
            let id = assign_id(&mut document)?;
            if !seen.insert(id.as_str().to_owned()) {
                return Err(StoreError::DuplicateId {
                    collection,
                    detail: format!("{id} appears twice in batch"),
                });
            }
            ids.push(id);
            batch.push(document);
        }

        let mut collections = self.collections.write().map_err(poisoned)?;
        let existing = collections.entry(collection).or_default();
        if let Some(id) = ids.iter().find(|id| contains_id(existing, id)) {
            return Err(StoreError::DuplicateId {
                collection,
                detail: id.to_string(),
            });
        }
        existing.extend(batch);

        Ok(ids)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<RawDocument>, StoreError> {
        let collections = self.collections.read().map_err(poisoned)?;
        let Some(documents) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .map(|doc| projection.map_or_else(|| doc.clone(), |p| p.apply(doc)))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        drop(self.collections.read().map_err(poisoned)?);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn doc(value: Value) -> RawDocument {
        match value {
            Value::Object(map) => map,
            _ => RawDocument::new(),
        }
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let store = MemoryDocumentStore::new();
        for name in ["c", "a", "b"] {
            store
                .insert_one(Collection::Products, doc(json!({"name": name})))
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .find(Collection::Products, &Filter::All, None)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store
            .insert_one(Collection::Products, doc(json!({"id": 1})))
            .await
            .unwrap();

        let skus = store
            .find(Collection::Skus, &Filter::All, None)
            .await
            .unwrap();
        assert!(skus.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryDocumentStore::new();
        store
            .insert_one(Collection::Orders, doc(json!({"_id": "ORD-1"})))
            .await
            .unwrap();

        let err = store
            .insert_one(Collection::Orders, doc(json!({"_id": "ORD-1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));

        let orders = store
            .find(Collection::Orders, &Filter::All, None)
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_numeric_id_is_unique_per_collection() {
        let store = MemoryDocumentStore::new();
        let id = store
            .insert_one(Collection::Products, doc(json!({"_id": 5, "id": 1})))
            .await
            .unwrap();
        assert_eq!(id.as_str(), "5");

        let err = store
            .insert_one(Collection::Products, doc(json!({"_id": 5, "id": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));

        let stored = store
            .find(Collection::Products, &Filter::All, None)
            .await
            .unwrap();
        assert_eq!(stored[0][ID_FIELD], json!(5));
    }

    #[tokio::test]
    async fn test_ping_fails_on_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryDocumentStore::new());
        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.collections.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            store.ping().await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_many_is_all_or_nothing() {
        let store = MemoryDocumentStore::new();
        let err = store
            .insert_many(
                Collection::Skus,
                vec![
                    doc(json!({"_id": "a", "sku": "A"})),
                    doc(json!({"_id": "a", "sku": "B"})),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));

        let skus = store
            .find(Collection::Skus, &Filter::All, None)
            .await
            .unwrap();
        assert!(skus.is_empty());
    }

    #[tokio::test]
    async fn test_find_applies_filter_and_projection() {
        let store = MemoryDocumentStore::new();
        store
            .insert_many(
                Collection::Products,
                vec![
                    doc(json!({"id": 1, "name": "Wireless Mouse", "price": 25.0})),
                    doc(json!({"id": 2, "name": "Keyboard", "price": 45.0})),
                    doc(json!({"id": 3, "name": "Wireless Mouse", "price": 30.0})),
                ],
            )
            .await
            .unwrap();

        let found = store
            .find(
                Collection::Products,
                &Filter::equals("name", "Wireless Mouse"),
                Some(&Projection::only(["id"])),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        for document in &found {
            assert!(document.contains_key(ID_FIELD));
            assert!(document.contains_key("id"));
            assert!(!document.contains_key("price"));
        }
        assert_eq!(found[0]["id"], json!(1));
        assert_eq!(found[1]["id"], json!(3));
    }

    #[tokio::test]
    async fn test_ping() {
        MemoryDocumentStore::new().ping().await.unwrap();
    }
}

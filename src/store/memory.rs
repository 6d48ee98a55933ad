//! In-memory document store for testing and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{Document, DocumentStore, StoreError};
use crate::types::Collection;

/// In-memory document store.
///
/// Uses BTreeMap for deterministic iteration order, so scans return
/// documents sorted by id.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<BTreeMap<Collection, BTreeMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, replacing any previous one.
    pub fn insert(&self, collection: Collection, id: impl Into<String>, document: Document) {
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .insert(id.into(), document);
    }

    /// Builder-style seeding.
    pub fn with_document(self, collection: Collection, id: impl Into<String>, document: Document) -> Self {
        self.insert(collection, id, document);
        self
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Whether a collection holds no documents.
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    /// Raw copy of a stored document.
    pub fn snapshot(&self, collection: Collection, id: &str) -> Option<Document> {
        self.collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.snapshot(collection, id))
    }

    async fn set(&self, collection: Collection, id: &str, document: Document) -> Result<(), StoreError> {
        self.insert(collection, id, document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

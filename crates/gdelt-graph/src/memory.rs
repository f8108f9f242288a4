//! In-memory store backend.
//!
//! Implements the full `GraphStore` collection/document surface in process.
//! Used by the loader tests; also handy for dry-running a load without a
//! database. AQL is not supported here.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::store::{CollectionInfo, CollectionKind, GraphStore, JsonMap, StoreError};

#[derive(Debug)]
struct MemCollection {
    kind: CollectionKind,
    documents: Vec<JsonMap>,
}

/// A `GraphStore` over process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, MemCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all documents in a collection, in insertion order.
    pub fn documents(&self, name: &str) -> Vec<JsonMap> {
        self.collections
            .lock()
            .expect("memory store poisoned")
            .get(name)
            .map(|c| c.documents.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, StoreError> {
        let collections = self.collections.lock().expect("memory store poisoned");
        Ok(collections
            .keys()
            .map(|name| CollectionInfo {
                name: name.clone(),
                is_system: name.starts_with('_'),
            })
            .collect())
    }

    async fn has_collection(&self, name: &str) -> Result<bool, StoreError> {
        let collections = self.collections.lock().expect("memory store poisoned");
        Ok(collections.contains_key(name))
    }

    async fn create_collection(
        &self,
        name: &str,
        kind: CollectionKind,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("memory store poisoned");
        if collections.contains_key(name) {
            return Err(StoreError::Rejected {
                collection: name.to_string(),
                reason: "collection already exists".to_string(),
            });
        }
        collections.insert(
            name.to_string(),
            MemCollection {
                kind,
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn truncate_collection(&self, name: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("memory store poisoned");
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        collection.documents.clear();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("memory store poisoned");
        collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    async fn document_count(&self, name: &str) -> Result<u64, StoreError> {
        let collections = self.collections.lock().expect("memory store poisoned");
        let collection = collections
            .get(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        Ok(collection.documents.len() as u64)
    }

    async fn insert_document(
        &self,
        collection: &str,
        document: &JsonMap,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().expect("memory store poisoned");
        let target = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        // Edge collections require endpoint handles, same as the real store.
        if target.kind == CollectionKind::Edge
            && (!document.contains_key("_from") || !document.contains_key("_to"))
        {
            return Err(StoreError::Rejected {
                collection: collection.to_string(),
                reason: "edge document without _from/_to".to_string(),
            });
        }

        if let Some(key) = document.get("_key").and_then(Value::as_str) {
            let duplicate = target
                .documents
                .iter()
                .any(|d| d.get("_key").and_then(Value::as_str) == Some(key));
            if duplicate {
                return Err(StoreError::Conflict {
                    collection: collection.to_string(),
                    key: key.to_string(),
                });
            }
        }

        collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?
            .documents
            .push(document.clone());
        Ok(())
    }

    async fn query(&self, _aql: &str, _bind_vars: JsonMap) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unsupported("AQL queries"))
    }
}

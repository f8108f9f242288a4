//! Collection provisioning.
//!
//! Ensures the three vertex collections and the edge collection exist before
//! a load, truncates them for full-refresh semantics, and offers the
//! destructive drop-everything reset used to rebuild an environment.

use tracing::info;

use gdelt_core::mapper::{ACTORS, EVENTS, LOCATIONS, RELATIONS};

use crate::store::{CollectionKind, GraphStore, StoreError};

/// Handles to the four target collections, keyed by logical name.
#[derive(Debug, Clone)]
pub struct CollectionSet {
    pub events: &'static str,
    pub actors: &'static str,
    pub locations: &'static str,
    pub relations: &'static str,
}

impl CollectionSet {
    const SCHEMA: [(&'static str, CollectionKind); 4] = [
        (EVENTS, CollectionKind::Vertex),
        (ACTORS, CollectionKind::Vertex),
        (LOCATIONS, CollectionKind::Vertex),
        (RELATIONS, CollectionKind::Edge),
    ];

    /// Create any missing target collection. Safe to run repeatedly.
    pub async fn provision(store: &dyn GraphStore) -> Result<Self, StoreError> {
        for (name, kind) in Self::SCHEMA {
            if !store.has_collection(name).await? {
                info!(collection = name, ?kind, "Creating missing collection");
                store.create_collection(name, kind).await?;
            }
        }
        Ok(Self {
            events: EVENTS,
            actors: ACTORS,
            locations: LOCATIONS,
            relations: RELATIONS,
        })
    }

    pub fn names(&self) -> [&'static str; 4] {
        [self.events, self.actors, self.locations, self.relations]
    }

    /// Truncate all four collections. Called exactly once per load run,
    /// before any row is processed.
    pub async fn reset_all(&self, store: &dyn GraphStore) -> Result<(), StoreError> {
        for name in self.names() {
            store.truncate_collection(name).await?;
        }
        info!("Truncated all target collections");
        Ok(())
    }
}

/// Delete every non-system collection in the database.
///
/// Fully destructive environment reset. Never runs as part of a normal
/// load; callers must invoke it explicitly.
pub async fn drop_non_system_collections(
    store: &dyn GraphStore,
) -> Result<usize, StoreError> {
    let mut dropped = 0;
    for collection in store.list_collections().await? {
        if collection.is_system {
            continue;
        }
        store.delete_collection(&collection.name).await?;
        info!(collection = %collection.name, "Dropped collection");
        dropped += 1;
    }
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_provision_creates_all_four_and_is_idempotent() {
        let store = MemoryStore::new();
        let set = CollectionSet::provision(&store).await.unwrap();
        for name in set.names() {
            assert!(store.has_collection(name).await.unwrap());
        }
        // second provision must not fail on existing collections
        CollectionSet::provision(&store).await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_non_system_skips_system_namespace() {
        let store = MemoryStore::new();
        CollectionSet::provision(&store).await.unwrap();
        store
            .create_collection("_internal", CollectionKind::Vertex)
            .await
            .unwrap();

        let dropped = drop_non_system_collections(&store).await.unwrap();
        assert_eq!(dropped, 4);
        assert!(store.has_collection("_internal").await.unwrap());
        assert!(!store.has_collection(EVENTS).await.unwrap());
    }
}

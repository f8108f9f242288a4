//! Store capability surface.
//!
//! The load pipeline depends on this trait only, never on a specific store's
//! wire protocol. `ArangoStore` speaks the ArangoDB HTTP API; `MemoryStore`
//! implements the same surface in process for tests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A JSON document body.
pub type JsonMap = serde_json::Map<String, Value>;

/// Errors surfaced by a graph store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("duplicate key '{key}' in collection '{collection}'")]
    Conflict { collection: String, key: String },

    #[error("store rejected document in '{collection}': {reason}")]
    Rejected { collection: String, reason: String },

    #[error("malformed store response: {0}")]
    InvalidResponse(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("not supported by this backend: {0}")]
    Unsupported(&'static str),
}

impl StoreError {
    /// Whether this error is attributable to a single document.
    ///
    /// Row-scoped rejections are recorded and skipped by the loader;
    /// everything else aborts the run.
    pub fn is_row_scoped(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict { .. } | StoreError::Rejected { .. }
        )
    }
}

/// Vertex vs. edge collection. The distinction must be declared at creation
/// time: edge collections reject documents without endpoint handles, and
/// vertex collections are not traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Vertex,
    Edge,
}

/// Name and namespace of one collection.
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    pub is_system: bool,
}

/// Capability surface of a document/graph database.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>, StoreError>;

    async fn has_collection(&self, name: &str) -> Result<bool, StoreError>;

    async fn create_collection(
        &self,
        name: &str,
        kind: CollectionKind,
    ) -> Result<(), StoreError>;

    /// Empty a collection without dropping it.
    async fn truncate_collection(&self, name: &str) -> Result<(), StoreError>;

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError>;

    async fn document_count(&self, name: &str) -> Result<u64, StoreError>;

    /// Insert one document. Key conflicts and validation failures come back
    /// as structured row-scoped errors.
    async fn insert_document(
        &self,
        collection: &str,
        document: &JsonMap,
    ) -> Result<(), StoreError>;

    /// Run a declarative AQL query and return its result documents.
    async fn query(&self, aql: &str, bind_vars: JsonMap) -> Result<Vec<Value>, StoreError>;
}

//! # GDELT Graph
//!
//! Store integration for the GDELT event graph: the `GraphStore` capability
//! trait with ArangoDB HTTP and in-memory backends, collection provisioning,
//! the CSV load orchestrator, and the analytical queries that run against
//! the loaded graph.

pub mod arango;
pub mod loader;
pub mod memory;
pub mod provision;
pub mod queries;
pub mod store;

pub use arango::{ArangoStore, StoreConfig};
pub use loader::{run_load, LoadError, LoadOutcome, LoadReport, RowFailure};
pub use memory::MemoryStore;
pub use provision::{drop_non_system_collections, CollectionSet};
pub use store::{CollectionInfo, CollectionKind, GraphStore, JsonMap, StoreError};

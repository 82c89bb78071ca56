//! Ontology class hierarchy.
//!
//! The hierarchy is read once per run from a [`HierarchyStore`] and turned
//! into an [`OntologyHierarchy`], which answers ancestor, depth and
//! neighbourhood queries for the ranking engine.
//!
//! # Stores
//!
//! - [`SnapshotStore`] - a JSON document with nodes, edges and properties
//! - [`SurrealHierarchyStore`] - SurrealDB embedded with RocksDB persistence
//!
//! # Example
//!
//! ```ignore
//! use tablink_core::hierarchy::{HierarchyStore, OntologyHierarchy, SnapshotStore};
//!
//! let store = SnapshotStore::new("data/hierarchy.json");
//! let hierarchy = OntologyHierarchy::build(&store.load().await?);
//!
//! assert_eq!(hierarchy.depth("http://dbpedia.org/ontology/City"), Some(3));
//! ```

mod db;
mod engine;
mod error;
pub mod models;
mod store;

pub use db::SurrealHierarchyStore;
pub use engine::OntologyHierarchy;
pub use error::HierarchyError;
pub use models::{ClassNode, HierarchyEdge, HierarchyProperties, HierarchySnapshot};
pub use store::SnapshotStore;

use async_trait::async_trait;
use std::path::Path;

use crate::config::HierarchyConfig;

/// Backend name of [`SnapshotStore`].
pub const SNAPSHOT_BACKEND: &str = "snapshot";

/// Backend name of [`SurrealHierarchyStore`].
pub const SURREAL_BACKEND: &str = "surreal";

/// Bulk read access to a persisted class hierarchy.
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    /// Read all nodes, edges and hierarchy properties.
    async fn load(&self) -> Result<HierarchySnapshot, HierarchyError>;
}

/// Open the store named by the configuration.
pub async fn open_store(config: &HierarchyConfig) -> Result<Box<dyn HierarchyStore>, HierarchyError> {
    match config.backend.as_str() {
        SNAPSHOT_BACKEND => Ok(Box::new(SnapshotStore::new(&config.path))),
        SURREAL_BACKEND => {
            let store =
                SurrealHierarchyStore::open(Path::new(&config.path), &config.namespace, &config.database)
                    .await?;
            Ok(Box::new(store))
        }
        other => Err(HierarchyError::UnknownBackend(other.to_string())),
    }
}

/// Open the configured store and build the in-memory hierarchy.
pub async fn load_hierarchy(config: &HierarchyConfig) -> Result<OntologyHierarchy, HierarchyError> {
    let store = open_store(config).await?;
    let snapshot = store.load().await?;
    Ok(OntologyHierarchy::build(&snapshot))
}

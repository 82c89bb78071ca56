//! SurrealDB embedded store for the class hierarchy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::sql::Thing;
use surrealdb::Surreal;
use tracing::info;

use super::engine::OntologyHierarchy;
use super::error::HierarchyError;
use super::models::{ClassNode, HierarchyEdge, HierarchyProperties, HierarchySnapshot};
use super::HierarchyStore;

const MAX_DEPTH_KEY: &str = "max_depth";
const DIAMETER_KEY: &str = "diameter";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    uri: String,
    depth: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    child: String,
    parent: String,
    /// Insertion order, keeps "first parent" stable across reads.
    seq: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PropertyRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    key: String,
    value: i64,
}

/// Database connection holding classes, subclass edges and hierarchy properties.
pub struct SurrealHierarchyStore {
    db: Surreal<Db>,
}

impl SurrealHierarchyStore {
    /// Open or create a database at the given path.
    pub async fn open(path: &Path, namespace: &str, database: &str) -> Result<Self, HierarchyError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(namespace).use_db(database).await?;

        let store = Self { db };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), HierarchyError> {
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS class SCHEMAFULL;
                DEFINE FIELD IF NOT EXISTS uri ON class TYPE string;
                DEFINE FIELD IF NOT EXISTS depth ON class TYPE option<int>;
                DEFINE INDEX IF NOT EXISTS class_uri ON class FIELDS uri UNIQUE;

                DEFINE TABLE IF NOT EXISTS subclass_of SCHEMAFULL;
                DEFINE FIELD IF NOT EXISTS child ON subclass_of TYPE string;
                DEFINE FIELD IF NOT EXISTS parent ON subclass_of TYPE string;
                DEFINE FIELD IF NOT EXISTS seq ON subclass_of TYPE int;
                DEFINE INDEX IF NOT EXISTS subclass_child ON subclass_of FIELDS child;

                DEFINE TABLE IF NOT EXISTS hierarchy_property SCHEMAFULL;
                DEFINE FIELD IF NOT EXISTS key ON hierarchy_property TYPE string;
                DEFINE FIELD IF NOT EXISTS value ON hierarchy_property TYPE int;
                DEFINE INDEX IF NOT EXISTS property_key ON hierarchy_property FIELDS key UNIQUE;
                "#,
            )
            .await?;
        Ok(())
    }

    /// Replace the stored hierarchy.
    ///
    /// Depths and max depth are computed by building the hierarchy first, so
    /// the stored values always agree with what the engine derives. The
    /// diameter is taken from the snapshot as-is.
    pub async fn import(&self, snapshot: &HierarchySnapshot) -> Result<OntologyHierarchy, HierarchyError> {
        let hierarchy = OntologyHierarchy::build(snapshot);
        let computed = hierarchy.to_snapshot();

        self.db
            .query("DELETE class; DELETE subclass_of; DELETE hierarchy_property;")
            .await?;

        for node in &computed.nodes {
            let row = ClassRow {
                id: None,
                uri: node.uri.clone(),
                depth: node.depth.map(i64::from),
            };
            let _: Option<ClassRow> = self.db.create("class").content(row).await?;
        }

        for (seq, edge) in computed.edges.iter().enumerate() {
            let row = EdgeRow {
                id: None,
                child: edge.child.clone(),
                parent: edge.parent.clone(),
                seq: seq as i64,
            };
            let _: Option<EdgeRow> = self.db.create("subclass_of").content(row).await?;
        }

        let mut properties = vec![(MAX_DEPTH_KEY, hierarchy.max_depth())];
        if let Some(diameter) = snapshot.properties.diameter {
            properties.push((DIAMETER_KEY, diameter));
        }
        for (key, value) in properties {
            let row = PropertyRow {
                id: None,
                key: key.to_string(),
                value: i64::from(value),
            };
            let _: Option<PropertyRow> = self.db.create("hierarchy_property").content(row).await?;
        }

        info!(
            classes = computed.nodes.len(),
            edges = computed.edges.len(),
            max_depth = hierarchy.max_depth(),
            "imported class hierarchy"
        );

        Ok(hierarchy)
    }
}

#[async_trait]
impl HierarchyStore for SurrealHierarchyStore {
    async fn load(&self) -> Result<HierarchySnapshot, HierarchyError> {
        let classes: Vec<ClassRow> = self
            .db
            .query("SELECT * FROM class ORDER BY uri")
            .await?
            .take(0)?;

        let edges: Vec<EdgeRow> = self
            .db
            .query("SELECT * FROM subclass_of ORDER BY seq")
            .await?
            .take(0)?;

        let rows: Vec<PropertyRow> = self
            .db
            .query("SELECT * FROM hierarchy_property")
            .await?
            .take(0)?;

        let mut properties = HierarchyProperties::default();
        for row in rows {
            let value = u32::try_from(row.value).ok();
            match row.key.as_str() {
                MAX_DEPTH_KEY => properties.max_depth = value,
                DIAMETER_KEY => properties.diameter = value,
                _ => {}
            }
        }

        Ok(HierarchySnapshot {
            nodes: classes
                .into_iter()
                .map(|c| ClassNode {
                    uri: c.uri,
                    depth: c.depth.and_then(|d| u32::try_from(d).ok()),
                })
                .collect(),
            edges: edges
                .into_iter()
                .map(|e| HierarchyEdge::new(e.child, e.parent))
                .collect(),
            properties,
        })
    }
}

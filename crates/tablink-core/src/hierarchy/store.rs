//! JSON snapshot store.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::HierarchyError;
use super::models::HierarchySnapshot;
use super::HierarchyStore;

/// Hierarchy stored as a single JSON document.
///
/// ```text
/// {
///   "nodes": [{"uri": "...", "depth": 3}],
///   "edges": [{"child": "...", "parent": "..."}],
///   "properties": {"max_depth": 7, "diameter": 14}
/// }
/// ```
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot, creating parent directories.
    pub fn save(&self, snapshot: &HierarchySnapshot) -> Result<(), HierarchyError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| HierarchyError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| HierarchyError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| HierarchyError::io(&self.path, e))
    }
}

#[async_trait]
impl HierarchyStore for SnapshotStore {
    async fn load(&self) -> Result<HierarchySnapshot, HierarchyError> {
        let json = fs::read_to_string(&self.path).map_err(|e| HierarchyError::io(&self.path, e))?;

        serde_json::from_str(&json).map_err(|e| HierarchyError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

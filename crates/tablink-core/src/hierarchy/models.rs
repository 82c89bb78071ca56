//! Data models for the class hierarchy.

use serde::{Deserialize, Serialize};

/// A class of the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassNode {
    /// Class URI.
    pub uri: String,
    /// Length of the ancestor chain up to the root.
    #[serde(default)]
    pub depth: Option<u32>,
}

impl ClassNode {
    /// Create a node whose depth is not known yet.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            depth: None,
        }
    }

    /// Set the depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// CHILD subclass-of PARENT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyEdge {
    /// Subclass URI.
    pub child: String,
    /// Superclass URI.
    pub parent: String,
}

impl HierarchyEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

/// Scalar properties computed over the whole hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyProperties {
    /// Longest ancestor chain.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Longest shortest path between two classes.
    #[serde(default)]
    pub diameter: Option<u32>,
}

/// Everything a hierarchy store hands over in one bulk read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    #[serde(default)]
    pub nodes: Vec<ClassNode>,
    #[serde(default)]
    pub edges: Vec<HierarchyEdge>,
    #[serde(default)]
    pub properties: HierarchyProperties,
}

impl HierarchySnapshot {
    /// Build a snapshot from `(child, parent)` pairs, registering every URI as a node.
    pub fn from_pairs<I, C, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut snapshot = Self::default();
        for (child, parent) in pairs {
            let edge = HierarchyEdge::new(child, parent);
            for uri in [&edge.child, &edge.parent] {
                if !snapshot.nodes.iter().any(|n| &n.uri == uri) {
                    snapshot.nodes.push(ClassNode::new(uri.clone()));
                }
            }
            snapshot.edges.push(edge);
        }
        snapshot
    }

    /// Set the externally computed diameter.
    pub fn with_diameter(mut self, diameter: u32) -> Self {
        self.properties.diameter = Some(diameter);
        self
    }
}

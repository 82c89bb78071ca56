//! In-memory class hierarchy.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::models::{ClassNode, HierarchyEdge, HierarchyProperties, HierarchySnapshot};

/// Parent/child adjacency over the ontology classes with cached depths.
///
/// Depth computation assumes single inheritance. A class with more than one
/// direct parent is an anomaly: it is logged once at build time, listed by
/// [`OntologyHierarchy::anomalies`], and ancestor walks follow its first
/// parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OntologyHierarchy {
    nodes: HashMap<String, ClassNode>,
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
    max_depth: u32,
    diameter: u32,
    anomalies: BTreeSet<String>,
}

impl OntologyHierarchy {
    /// Build the hierarchy from a store snapshot.
    ///
    /// Duplicate edges collapse, so building twice from the same snapshot
    /// yields equal values.
    pub fn build(snapshot: &HierarchySnapshot) -> Self {
        let mut hierarchy = Self::default();

        for node in &snapshot.nodes {
            hierarchy
                .nodes
                .entry(node.uri.clone())
                .or_insert_with(|| ClassNode::new(node.uri.clone()));
        }

        for edge in &snapshot.edges {
            hierarchy.insert_edge(edge);
        }

        for (uri, parents) in &hierarchy.parents {
            if parents.len() > 1 {
                warn!(
                    class = %uri,
                    parents = ?parents,
                    "class has more than one parent; depth follows the first"
                );
                hierarchy.anomalies.insert(uri.clone());
            }
        }

        let depths: Vec<(String, u32)> = hierarchy
            .nodes
            .keys()
            .map(|uri| (uri.clone(), hierarchy.ancestor_chain(uri).len() as u32))
            .collect();

        for (uri, depth) in depths {
            hierarchy.max_depth = hierarchy.max_depth.max(depth);
            if let Some(node) = hierarchy.nodes.get_mut(&uri) {
                node.depth = Some(depth);
            }
        }

        if let Some(stored) = snapshot.properties.max_depth {
            if stored != hierarchy.max_depth {
                debug!(
                    stored,
                    computed = hierarchy.max_depth,
                    "stored max depth differs from computed"
                );
            }
        }

        hierarchy.diameter = snapshot.properties.diameter.unwrap_or(0);
        hierarchy
    }

    fn insert_edge(&mut self, edge: &HierarchyEdge) {
        if edge.child == edge.parent {
            warn!(class = %edge.child, "ignoring self-referencing subclass edge");
            return;
        }

        for uri in [&edge.child, &edge.parent] {
            self.nodes
                .entry(uri.clone())
                .or_insert_with(|| ClassNode::new(uri.clone()));
        }

        let parents = self.parents.entry(edge.child.clone()).or_default();
        if !parents.contains(&edge.parent) {
            parents.push(edge.parent.clone());
        }

        let children = self.children.entry(edge.parent.clone()).or_default();
        if !children.contains(&edge.child) {
            children.push(edge.child.clone());
        }
    }

    /// Walk first parents until the root, stopping on a cycle.
    fn ancestor_chain<'a>(&'a self, uri: &str) -> Vec<&'a str> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([uri]);
        let mut current = uri;

        while let Some(parent) = self.parents.get(current).and_then(|p| p.first()) {
            if !seen.insert(parent.as_str()) {
                warn!(class = %uri, at = %parent, "cycle in subclass edges");
                break;
            }
            chain.push(parent.as_str());
            current = parent.as_str();
        }

        chain
    }

    /// Ancestors of a class, nearest parent first.
    ///
    /// Unknown classes have no ancestors.
    pub fn ancestors(&self, uri: &str) -> Vec<&ClassNode> {
        self.ancestor_chain(uri)
            .into_iter()
            .filter_map(|a| self.nodes.get(a))
            .collect()
    }

    /// Ancestor URIs of a class, nearest parent first.
    pub fn ancestor_uris(&self, uri: &str) -> Vec<&str> {
        self.ancestor_chain(uri)
    }

    /// Cached depth, `None` when the class is not part of the hierarchy.
    pub fn depth(&self, uri: &str) -> Option<u32> {
        self.nodes.get(uri).and_then(|n| n.depth)
    }

    /// Depth with unknown classes counted as zero.
    pub fn depth_or_zero(&self, uri: &str) -> u32 {
        self.depth(uri).unwrap_or(0)
    }

    /// `depth / max_depth`, zero when the hierarchy is flat.
    pub fn relative_depth(&self, depth: u32) -> f64 {
        if self.max_depth == 0 {
            0.0
        } else {
            depth as f64 / self.max_depth as f64
        }
    }

    /// Longest ancestor chain in the hierarchy.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Diameter supplied by the store (0 when unknown).
    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    /// Classes with more than one direct parent, sorted.
    pub fn anomalies(&self) -> impl Iterator<Item = &str> {
        self.anomalies.iter().map(String::as_str)
    }

    /// Direct parents of a class.
    pub fn parents(&self, uri: &str) -> &[String] {
        self.parents.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct children of a class.
    pub fn children(&self, uri: &str) -> &[String] {
        self.children.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All transitive subclasses, breadth-first.
    pub fn descendants(&self, uri: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([uri]);
        let mut queue: VecDeque<&str> = VecDeque::from([uri]);

        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                if seen.insert(child.as_str()) {
                    out.push(child.as_str());
                    queue.push_back(child.as_str());
                }
            }
        }

        out
    }

    /// Classes within `distance` parent or child hops, excluding the class itself.
    pub fn neighbourhood(&self, uri: &str, distance: usize) -> BTreeSet<&str> {
        let mut found = BTreeSet::new();
        let mut seen: HashSet<&str> = HashSet::from([uri]);
        let mut frontier = vec![uri];

        for _ in 0..distance {
            let mut next = Vec::new();
            for current in frontier {
                for other in self.parents(current).iter().chain(self.children(current)) {
                    if seen.insert(other.as_str()) {
                        found.insert(other.as_str());
                        next.push(other.as_str());
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        found
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.nodes.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Export nodes with computed depths, edges in first-parent order, and properties.
    pub fn to_snapshot(&self) -> HierarchySnapshot {
        let mut nodes: Vec<ClassNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.uri.cmp(&b.uri));

        let mut edges = Vec::new();
        for node in &nodes {
            for parent in self.parents(&node.uri) {
                edges.push(HierarchyEdge::new(node.uri.clone(), parent.clone()));
            }
        }

        HierarchySnapshot {
            nodes,
            edges,
            properties: HierarchyProperties {
                max_depth: Some(self.max_depth),
                diameter: Some(self.diameter),
            },
        }
    }
}

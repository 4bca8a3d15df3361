//! The immutable graph produced by a build
//!
//! Nodes and edges live in flat vectors and are addressed by index.
//! Per-node adjacency (outgoing and incoming edge indexes), relation
//! counts and the name index are computed once when the graph is frozen;
//! nothing mutates afterwards, so a `&Graph` can be shared freely across
//! threads.

use crate::edge::Edge;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Edge tallies for one relation on one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationCount {
    pub outgoing: usize,
    pub incoming: usize,
}

/// Normalize a display name for name-index lookups
///
/// Case-folds and trims, collapsing inner whitespace runs. Node names and
/// text-derived candidate names both go through this function.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Graph of resolved nodes and directed, relation-labelled edges
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
    names: HashMap<(String, String), usize>,
    types: BTreeSet<String>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    counts: Vec<BTreeMap<String, RelationCount>>,
}

impl Graph {
    /// Index a set of nodes with unique ids. Edges are attached by `freeze`.
    pub(crate) fn with_nodes(nodes: Vec<Node>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        let mut names: HashMap<(String, String), usize> = HashMap::new();
        let mut types = BTreeSet::new();

        for (i, node) in nodes.iter().enumerate() {
            index.insert(node.id.clone(), i);
            types.insert(node.node_type.0.clone());
            if node.name.is_empty() {
                continue;
            }
            let key = (node.node_type.0.clone(), normalize_name(&node.name));
            if let Some(&first) = names.get(&key) {
                tracing::debug!(
                    "Name '{}' of type {} already indexed for {}, keeping first",
                    node.name,
                    node.node_type,
                    nodes[first].id
                );
            } else {
                names.insert(key, i);
            }
        }

        let len = nodes.len();
        Self {
            nodes,
            edges: Vec::new(),
            index,
            names,
            types,
            outgoing: vec![Vec::new(); len],
            incoming: vec![Vec::new(); len],
            counts: vec![BTreeMap::new(); len],
        }
    }

    /// Attach the edge set, computing adjacency and counts in one pass
    ///
    /// A dangling edge is attached only to the node that holds the
    /// reference; its raw end never links to a node that happens to carry
    /// the same id.
    pub(crate) fn freeze(mut self, edges: Vec<Edge>) -> Self {
        for (e, edge) in edges.iter().enumerate() {
            let raw_source = !edge.resolved && edge.reversed;
            let raw_target = !edge.resolved && !edge.reversed;
            if let Some(&s) = self.index.get(&edge.source_id).filter(|_| !raw_source) {
                self.outgoing[s].push(e);
                self.counts[s].entry(edge.relation.clone()).or_default().outgoing += 1;
            }
            if let Some(&t) = self.index.get(&edge.target_id).filter(|_| !raw_target) {
                self.incoming[t].push(e);
                self.counts[t].entry(edge.relation.clone()).or_default().incoming += 1;
            }
        }
        self.edges = edges;
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of a node id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn edge_at(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Exact lookup through the name index
    pub fn lookup_name(&self, type_name: &str, name: &str) -> Option<&Node> {
        self.names
            .get(&(type_name.to_string(), normalize_name(name)))
            .map(|&i| &self.nodes[i])
    }

    /// Name lookup across every type, in type-name order
    pub fn lookup_name_any(&self, name: &str) -> Vec<&Node> {
        let normalized = normalize_name(name);
        self.types
            .iter()
            .filter_map(|t| self.names.get(&(t.clone(), normalized.clone())))
            .map(|&i| &self.nodes[i])
            .collect()
    }

    /// Type names present in the graph, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    /// Number of nodes per type
    pub fn type_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Edge indexes leaving the node at `index`
    pub fn outgoing_indexes(&self, index: usize) -> &[usize] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edge indexes arriving at the node at `index`
    pub fn incoming_indexes(&self, index: usize) -> &[usize] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Edge> {
        let slice = self.index_of(id).map(|i| self.outgoing_indexes(i)).unwrap_or(&[]);
        slice.iter().map(move |&e| &self.edges[e])
    }

    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &Edge> {
        let slice = self.index_of(id).map(|i| self.incoming_indexes(i)).unwrap_or(&[]);
        slice.iter().map(move |&e| &self.edges[e])
    }

    /// Per-relation counts for a node
    pub fn counts(&self, id: &str) -> Option<&BTreeMap<String, RelationCount>> {
        self.index_of(id).map(|i| &self.counts[i])
    }

    /// Total (incoming, outgoing) edges of a node
    pub fn degree(&self, id: &str) -> (usize, usize) {
        self.index_of(id)
            .map(|i| (self.incoming[i].len(), self.outgoing[i].len()))
            .unwrap_or((0, 0))
    }

    /// One-line description: type, name, attributes and `in<out` counts
    ///
    /// `display` restricts the attributes shown; empty shows all.
    pub fn summary(&self, node: &Node, display: &[String]) -> String {
        let mut parts = vec![
            format!("type: {}", node.node_type),
            format!("name: {}", node.name),
        ];
        for (field, value) in &node.attributes {
            if field == "name" || (!display.is_empty() && !display.contains(field)) {
                continue;
            }
            parts.push(format!("{}: {}", field, value));
        }
        let (incoming, outgoing) = self.degree(node.id.as_str());
        parts.push(format!("counts: {}<{}", incoming, outgoing));
        parts.join(", ")
    }
}

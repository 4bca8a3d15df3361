//! Graph traversal types and algorithms

use crate::edge::{Direction, Edge};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Traversal depth bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Limited(u32),
    Unbounded,
}

impl Depth {
    /// Whether nodes at `depth` may be reached
    pub fn allows(&self, depth: u32) -> bool {
        match self {
            Self::Limited(max) => depth <= *max,
            Self::Unbounded => true,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::Limited(1)
    }
}

impl std::str::FromStr for Depth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "unbounded" | "*" => Ok(Self::Unbounded),
            other => other
                .parse::<u32>()
                .map(Self::Limited)
                .map_err(|_| format!("invalid depth '{}': expected a number or 'all'", s)),
        }
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{}", n),
            Self::Unbounded => write!(f, "all"),
        }
    }
}

/// Traversal query builder (follows FindQuery pattern)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraversalQuery {
    /// Seed node ids
    pub seeds: Vec<String>,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default)]
    pub max_depth: Depth,

    /// Node types neither returned nor expanded
    #[serde(default)]
    pub exclude_types: Vec<String>,

    /// Only follow these relations (empty = all)
    #[serde(default)]
    pub relation_filter: Vec<String>,
}

impl TraversalQuery {
    pub fn new<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = Depth::Limited(depth);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_depth = Depth::Unbounded;
        self
    }

    pub fn exclude_types(mut self, types: Vec<String>) -> Self {
        self.exclude_types = types;
        self
    }

    pub fn filter_relations(mut self, relations: Vec<String>) -> Self {
        self.relation_filter = relations;
        self
    }
}

/// A node reached by a traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedNode {
    pub node: Node,

    /// BFS depth; seeds are 0
    pub depth: u32,

    /// Node this one was first reached from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub edges_traversed: usize,
    pub max_depth_reached: u32,
}

/// Result of a traversal
///
/// Holds each visited node once, in BFS order, and exactly one edge per
/// non-seed node: the edge along which it was first (shallowest) reached.
/// Alternate paths are not kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subgraph {
    pub direction: Direction,
    pub seeds: Vec<NodeId>,
    pub nodes: Vec<VisitedNode>,
    pub edges: Vec<Edge>,
    pub stats: TraversalStats,
}

impl Subgraph {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|v| v.node.id.as_str() == id)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|v| v.node.id.as_str()).collect()
    }

    pub fn depth_of(&self, id: &str) -> Option<u32> {
        self.nodes
            .iter()
            .find(|v| v.node.id.as_str() == id)
            .map(|v| v.depth)
    }

    /// Nodes in depth-first order along first-reached links, for tree display
    pub fn tree_order(&self) -> Vec<&VisitedNode> {
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, visited) in self.nodes.iter().enumerate() {
            if let Some(parent) = &visited.parent {
                children.entry(parent.as_str()).or_default().push(i);
            }
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, v)| v.parent.is_none())
            .map(|(i, _)| i)
            .rev()
            .collect();
        while let Some(i) = stack.pop() {
            let visited = &self.nodes[i];
            out.push(visited);
            if let Some(kids) = children.get(visited.node.id.as_str()) {
                stack.extend(kids.iter().rev());
            }
        }
        out
    }

    /// The edge that led to a node, if it is not a seed
    pub fn edge_to(&self, id: &str) -> Option<&Edge> {
        let reached = |e: &&Edge| match self.direction {
            Direction::Descendants => e.target_id.as_str() == id,
            Direction::Ancestors => e.source_id.as_str() == id,
        };
        self.edges.iter().find(reached)
    }
}

/// Graph traversal engine
pub struct TraversalEngine;

impl TraversalEngine {
    /// Breadth-first expansion from the seed set
    ///
    /// A node is expanded at most once, at the depth it was first reached,
    /// so cycles terminate. Dangling edges are never followed. Seeds of an
    /// excluded type are dropped like any other excluded node.
    pub fn execute(query: &TraversalQuery, graph: &Graph) -> Result<Subgraph> {
        tracing::debug!(
            "Executing traversal: seeds={:?}, depth={}, direction={:?}",
            query.seeds,
            query.max_depth,
            query.direction
        );

        let mut visited: Vec<bool> = vec![false; graph.node_count()];
        let mut queue: VecDeque<(usize, u32)> = VecDeque::new();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut seeds = Vec::new();
        let mut stats = TraversalStats::default();

        for seed in &query.seeds {
            let index = graph
                .index_of(seed)
                .ok_or_else(|| Error::NodeNotFound(seed.clone()))?;
            if visited[index] {
                continue;
            }
            let node = graph.nodes()[index].clone();
            if query.exclude_types.iter().any(|t| node.is_type(t)) {
                tracing::debug!("Seed {} has an excluded type, skipping", seed);
                continue;
            }
            visited[index] = true;
            seeds.push(node.id.clone());
            nodes.push(VisitedNode {
                node,
                depth: 0,
                parent: None,
            });
            queue.push_back((index, 0));
        }

        while let Some((current, depth)) = queue.pop_front() {
            stats.nodes_visited += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(depth);

            if !query.max_depth.allows(depth + 1) {
                continue;
            }

            let candidates = match query.direction {
                Direction::Descendants => graph.outgoing_indexes(current),
                Direction::Ancestors => graph.incoming_indexes(current),
            };

            for &e in candidates {
                let edge = &graph.edges()[e];
                if !edge.resolved {
                    continue;
                }

                // Apply relation filter
                if !query.relation_filter.is_empty() && !query.relation_filter.contains(&edge.relation) {
                    continue;
                }

                let next_id = match query.direction {
                    Direction::Descendants => &edge.target_id,
                    Direction::Ancestors => &edge.source_id,
                };
                let Some(next) = graph.index_of(next_id.as_str()) else {
                    continue;
                };
                if visited[next] {
                    continue;
                }

                // Apply type exclusion
                let node = &graph.nodes()[next];
                if query.exclude_types.iter().any(|t| node.is_type(t)) {
                    continue;
                }

                visited[next] = true;
                nodes.push(VisitedNode {
                    node: node.clone(),
                    depth: depth + 1,
                    parent: Some(graph.nodes()[current].id.clone()),
                });
                edges.push(edge.clone());
                stats.edges_traversed += 1;
                queue.push_back((next, depth + 1));
            }
        }

        tracing::debug!(
            "Traversal visited {} nodes, traversed {} edges",
            stats.nodes_visited,
            stats.edges_traversed
        );

        Ok(Subgraph {
            direction: query.direction,
            seeds,
            nodes,
            edges,
            stats,
        })
    }
}

/// Traverse from a seed set in one direction up to `max_depth`
pub fn traverse(
    graph: &Graph,
    seeds: &[&str],
    direction: Direction,
    max_depth: Depth,
) -> Result<Subgraph> {
    let mut query = TraversalQuery::new(seeds.iter().copied()).with_direction(direction);
    query.max_depth = max_depth;
    TraversalEngine::execute(&query, graph)
}

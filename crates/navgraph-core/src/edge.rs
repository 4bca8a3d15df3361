//! Edge types

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Direction for graph traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges backward, target -> source
    Ancestors,
    /// Follow edges forward, source -> target
    #[default]
    Descendants,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ancestors" | "parents" | "up" | "incoming" => Ok(Self::Ancestors),
            "descendants" | "children" | "down" | "outgoing" => Ok(Self::Descendants),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// What produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// A schema reference field
    Reference,
    /// A text matcher
    Text,
}

/// A directed, relation-labelled link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source_id: NodeId,

    pub target_id: NodeId,

    /// Reference field or matcher name that produced the edge
    pub relation: String,

    /// False when the referenced end could not be found
    pub resolved: bool,

    /// The reference is held by the target node; the source is the
    /// referenced end
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reversed: bool,

    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
        relation: impl Into<String>,
        kind: EdgeKind,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation: relation.into(),
            resolved: true,
            reversed: false,
            kind,
        }
    }

    /// Mark the edge as drawn from the referenced node to the holder
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Mark the edge as dangling
    pub fn dangling(mut self) -> Self {
        self.resolved = false;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }
}

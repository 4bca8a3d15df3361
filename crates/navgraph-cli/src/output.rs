//! Output formatting utilities

use std::collections::BTreeMap;

use navgraph_core::{Direction, FieldValue, Graph, Node, RelationCount, Subgraph};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}': expected table or json", other)),
        }
    }
}

/// Pretty JSON for any serializable value
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// A node with its degree counts, as shown to users
#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub node_type: &'a str,
    pub name: &'a str,
    pub origin: &'a str,
    pub incoming: usize,
    pub outgoing: usize,
    pub attributes: &'a BTreeMap<String, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<&'a BTreeMap<String, RelationCount>>,
}

impl<'a> NodeView<'a> {
    pub fn new(graph: &'a Graph, node: &'a Node) -> Self {
        let (incoming, outgoing) = graph.degree(node.id.as_str());
        Self {
            id: node.id.as_str(),
            node_type: node.node_type.as_str(),
            name: &node.name,
            origin: &node.origin,
            incoming,
            outgoing,
            attributes: &node.attributes,
            relations: graph.counts(node.id.as_str()).filter(|c| !c.is_empty()),
        }
    }
}

/// One line per node: id, then the summary
pub fn node_line(graph: &Graph, node: &Node, display: &[String]) -> String {
    format!("{}  {}", node.id, graph.summary(node, display))
}

/// Indented tree of a traversal, one node per line
///
/// Seeds are printed flush left; every other node is indented by its depth
/// and prefixed with the relation it was reached through.
pub fn render_tree(graph: &Graph, subgraph: &Subgraph) -> String {
    let arrow = match subgraph.direction {
        Direction::Descendants => "->",
        Direction::Ancestors => "<-",
    };

    let mut lines = Vec::with_capacity(subgraph.nodes.len());
    for visited in subgraph.tree_order() {
        let node = &visited.node;
        let (incoming, outgoing) = graph.degree(node.id.as_str());
        let label = format!(
            "{} ({}) {} [{}<{}]",
            node.id, node.node_type, node.name, incoming, outgoing
        );
        if visited.depth == 0 {
            lines.push(label);
            continue;
        }
        let relation = subgraph
            .edge_to(node.id.as_str())
            .map(|e| e.relation.as_str())
            .unwrap_or("?");
        lines.push(format!(
            "{}{} {}: {}",
            "  ".repeat(visited.depth as usize),
            arrow,
            relation,
            label
        ));
    }
    lines.join("\n")
}

//! Search engine traits

use async_trait::async_trait;
use navgraph_core::{FindQuery, Graph, MatchField, Node};
use std::borrow::Cow;
use std::cmp::Ordering;

pub use crate::error::{SearchError, SearchResult as Result};

/// Result from search including score
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub node: Node,
    pub score: f32,
}

/// Trait for search engines
///
/// Engines are stateless: everything they need is in the frozen graph.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Find nodes matching the query
    async fn search(&self, query: &FindQuery, graph: &Graph) -> Result<Vec<SearchHit>>;
}

/// Text a query's pattern is matched against
pub(crate) fn haystack<'g>(graph: &'g Graph, node: &'g Node, field: MatchField) -> Cow<'g, str> {
    match field {
        MatchField::Name => Cow::Borrowed(node.name.as_str()),
        MatchField::Summary => Cow::Owned(graph.summary(node, &[])),
    }
}

/// Deterministic result order: type name, then node name, then id
pub(crate) fn by_type_and_name(a: &Node, b: &Node) -> Ordering {
    (a.node_type.as_str(), a.name.as_str(), a.id.as_str()).cmp(&(
        b.node_type.as_str(),
        b.name.as_str(),
        b.id.as_str(),
    ))
}

pub(crate) fn truncate(hits: &mut Vec<SearchHit>, limit: Option<usize>) {
    if let Some(limit) = limit {
        hits.truncate(limit);
    }
}

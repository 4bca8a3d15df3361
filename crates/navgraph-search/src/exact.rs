//! Exact search engine - normalized name equality

use async_trait::async_trait;
use navgraph_core::{normalize_name, FindQuery, Graph, MatchField, Node};

use crate::traits::{by_type_and_name, haystack, truncate, Result, SearchEngine, SearchHit};

/// Exact name search engine (stateless)
///
/// Case-insensitive name queries go through the graph's name index, so a
/// name shared by several nodes of one type finds the first of them, as
/// references do. Case-sensitive queries and summaries scan every node;
/// against summaries the pattern is a plain substring.
pub struct ExactSearchEngine;

impl ExactSearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn from_index<'g>(query: &FindQuery, graph: &'g Graph) -> Vec<&'g Node> {
        let found: Vec<&Node> = match &query.type_filter {
            Some(type_name) => graph.lookup_name(type_name, &query.pattern).into_iter().collect(),
            None => graph.lookup_name_any(&query.pattern),
        };
        found
            .into_iter()
            .filter(|node| query.accepts_type(node.node_type.as_str()))
            .collect()
    }

    fn scan<'g>(query: &FindQuery, graph: &'g Graph) -> Vec<&'g Node> {
        let wanted = Self::fold(&query.pattern, query.case_insensitive);
        graph
            .nodes()
            .iter()
            .filter(|node| query.accepts_type(node.node_type.as_str()))
            .filter(|node| {
                let text = Self::fold(&haystack(graph, node, query.field), query.case_insensitive);
                match query.field {
                    MatchField::Name => text == wanted,
                    MatchField::Summary => text.contains(&wanted),
                }
            })
            .collect()
    }

    fn fold(text: &str, case_insensitive: bool) -> String {
        if case_insensitive {
            normalize_name(text)
        } else {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }
}

impl Default for ExactSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for ExactSearchEngine {
    async fn search(&self, query: &FindQuery, graph: &Graph) -> Result<Vec<SearchHit>> {
        query.validate()?;

        let mut matched = if query.field == MatchField::Name && query.case_insensitive {
            Self::from_index(query, graph)
        } else {
            Self::scan(query, graph)
        };
        matched.sort_by(|a, b| by_type_and_name(a, b));

        let mut hits: Vec<SearchHit> = matched
            .into_iter()
            .map(|node| SearchHit {
                node: node.clone(),
                score: 1.0,
            })
            .collect();
        truncate(&mut hits, query.limit);

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::fixtures::{graph, ids};

    #[tokio::test]
    async fn test_exact_name_normalized() {
        let graph = graph();
        let hits = ExactSearchEngine::new()
            .search(&FindQuery::new("  close   CASE "), &graph)
            .await
            .unwrap();
        assert_eq!(ids(&hits), vec!["F1"]);
    }

    #[tokio::test]
    async fn test_exact_is_not_substring_on_names() {
        let graph = graph();
        let hits = ExactSearchEngine::new()
            .search(&FindQuery::new("Case"), &graph)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_exact_case_sensitive() {
        let graph = graph();
        let engine = ExactSearchEngine::new();
        let query = FindQuery::new("close case").case_sensitive();
        assert!(engine.search(&query, &graph).await.unwrap().is_empty());

        let query = FindQuery::new("Close Case").case_sensitive();
        assert_eq!(ids(&engine.search(&query, &graph).await.unwrap()), vec!["F1"]);
    }

    #[tokio::test]
    async fn test_exact_type_filter_uses_name_index() {
        let graph = graph();
        let engine = ExactSearchEngine::new();

        let query = FindQuery::new("CLOSE reason").with_type("template");
        assert_eq!(ids(&engine.search(&query, &graph).await.unwrap()), vec!["T2"]);

        let query = FindQuery::new("close reason").with_type("formflow");
        assert!(engine.search(&query, &graph).await.unwrap().is_empty());

        let query = FindQuery::new("close reason").exclude_types(vec!["template".into()]);
        assert!(engine.search(&query, &graph).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exact_duplicate_name_finds_first() {
        use navgraph_core::{Diagnostics, GraphBuilder, Resolved};

        let resolved = ["T1", "T2"]
            .into_iter()
            .map(|id| Resolved {
                node: Node::new(id, "template", "Summary", format!("{id}.yaml")),
                refs: vec![],
            })
            .collect();
        let graph = GraphBuilder::link(resolved, &mut Diagnostics::new());

        let query = FindQuery::new("summary").with_type("template");
        let hits = ExactSearchEngine::new().search(&query, &graph).await.unwrap();
        assert_eq!(ids(&hits), vec!["T1"]);
        assert_eq!(graph.lookup_name("template", "summary").unwrap().id.as_str(), "T1");
    }

    #[tokio::test]
    async fn test_exact_summary_substring() {
        let graph = graph();
        let hits = ExactSearchEngine::new()
            .search(&FindQuery::new("type: image").match_summary(), &graph)
            .await
            .unwrap();
        assert_eq!(ids(&hits), vec!["IMG1"]);
    }
}

//! Fuzzy search using nucleo

use async_trait::async_trait;
use navgraph_core::{FindQuery, Graph, Node};
use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};

use crate::traits::{by_type_and_name, haystack, truncate, Result, SearchEngine, SearchHit};

/// Stateless fuzzy search engine using nucleo
pub struct FuzzySearchEngine;

impl FuzzySearchEngine {
    pub fn new() -> Self {
        Self
    }

    fn score_node(
        graph: &Graph,
        node: &Node,
        query: &FindQuery,
        pattern: &Pattern,
        matcher: &mut Matcher,
    ) -> Option<u32> {
        let text = haystack(graph, node, query.field);
        let mut buf = Vec::new();
        pattern.score(Utf32Str::new(&text, &mut buf), matcher)
    }
}

impl Default for FuzzySearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for FuzzySearchEngine {
    async fn search(&self, query: &FindQuery, graph: &Graph) -> Result<Vec<SearchHit>> {
        query.validate()?;

        let case = if query.case_insensitive {
            CaseMatching::Ignore
        } else {
            CaseMatching::Respect
        };
        let pattern = Pattern::new(&query.pattern, case, Normalization::Smart, AtomKind::Fuzzy);
        let mut matcher = Matcher::new(Config::DEFAULT);

        // Score and filter nodes
        let mut scored: Vec<(&Node, u32)> = graph
            .nodes()
            .iter()
            .filter(|node| query.accepts_type(node.node_type.as_str()))
            .filter_map(|node| {
                Self::score_node(graph, node, query, &pattern, &mut matcher).map(|score| (node, score))
            })
            .collect();

        // Sort by score descending, ties in the usual order
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| by_type_and_name(a.0, b.0)));

        let mut hits: Vec<SearchHit> = scored
            .into_iter()
            .map(|(node, score)| SearchHit {
                node: node.clone(),
                score: score as f32,
            })
            .collect();
        truncate(&mut hits, query.limit);

        Ok(hits)
    }
}

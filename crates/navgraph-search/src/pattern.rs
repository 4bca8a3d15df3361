//! Regular-expression search engine

use async_trait::async_trait;
use navgraph_core::limits::MAX_REGEX_SIZE;
use navgraph_core::{FindQuery, Graph};
use regex::{Regex, RegexBuilder};

use crate::traits::{by_type_and_name, haystack, truncate, Result, SearchEngine, SearchError, SearchHit};

/// Regex search over node names or summaries (stateless)
pub struct RegexSearchEngine;

impl RegexSearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate and compile the query pattern
    pub fn compile(query: &FindQuery) -> Result<Regex> {
        query.validate()?;
        RegexBuilder::new(&query.pattern)
            .case_insensitive(query.case_insensitive)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| SearchError::InvalidPattern {
                pattern: query.pattern.clone(),
                reason: e.to_string(),
            })
    }
}

impl Default for RegexSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for RegexSearchEngine {
    async fn search(&self, query: &FindQuery, graph: &Graph) -> Result<Vec<SearchHit>> {
        let regex = Self::compile(query)?;

        let mut matched: Vec<_> = graph
            .nodes()
            .iter()
            .filter(|node| query.accepts_type(node.node_type.as_str()))
            .filter(|node| regex.is_match(&haystack(graph, node, query.field)))
            .collect();
        matched.sort_by(|a, b| by_type_and_name(a, b));

        let mut hits: Vec<SearchHit> = matched
            .into_iter()
            .map(|node| SearchHit {
                node: node.clone(),
                score: 1.0,
            })
            .collect();
        truncate(&mut hits, query.limit);

        tracing::debug!("Regex '{}' matched {} nodes", query.pattern, hits.len());
        Ok(hits)
    }
}

//! Navgraph Search - Find engines for the configuration graph
//!
//! Provides regex search (the default), exact name search and fuzzy
//! search (nucleo).

pub mod error;
pub mod exact;
pub mod pattern;
pub mod traits;

#[cfg(feature = "fuzzy")]
pub mod fuzzy;

pub use error::{SearchError, SearchResult};
pub use exact::ExactSearchEngine;
pub use pattern::RegexSearchEngine;
pub use traits::{SearchEngine, SearchHit};

#[cfg(feature = "fuzzy")]
pub use fuzzy::FuzzySearchEngine;

use navgraph_core::{FindQuery, Graph, SearchMode};

/// Engine for a search mode
pub fn engine_for(mode: SearchMode) -> SearchResult<Box<dyn SearchEngine>> {
    match mode {
        SearchMode::Regex => Ok(Box::new(RegexSearchEngine::new())),
        SearchMode::Exact => Ok(Box::new(ExactSearchEngine::new())),
        #[cfg(feature = "fuzzy")]
        SearchMode::Fuzzy => Ok(Box::new(FuzzySearchEngine::new())),
        #[cfg(not(feature = "fuzzy"))]
        SearchMode::Fuzzy => Err(SearchError::Validation(
            "fuzzy search requires the 'fuzzy' feature".to_string(),
        )),
    }
}

/// Run a query with the engine its mode selects
pub async fn find(query: &FindQuery, graph: &Graph) -> SearchResult<Vec<SearchHit>> {
    engine_for(query.mode)?.search(query, graph).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::fixtures::{graph, ids};
    use navgraph_core::{
        traverse, Depth, Direction, EntityTypeSchema, GraphBuilder, RawRecord, ReferenceField,
        SchemaRegistry,
    };
    use std::sync::Arc;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(vec![
            EntityTypeSchema::new("formflow")
                .with_field("id", "guid")
                .with_field("name", "name")
                .with_field("tasks", "tasks")
                .with_reference(ReferenceField::new("tasks").targeting("template")),
            EntityTypeSchema::new("template")
                .with_field("id", "guid")
                .with_field("name", "name"),
        ])
        .unwrap()
    }

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("template", "t/b.yaml")
                .with_field("guid", "T2")
                .with_field("name", "Case Notes"),
            RawRecord::new("formflow", "f/z.yaml")
                .with_field("guid", "F3")
                .with_field("name", "Reopen Case")
                .with_field("tasks", vec!["T2"]),
            RawRecord::new("formflow", "f/a.yaml")
                .with_field("guid", "F1")
                .with_field("name", "Close Case")
                .with_field("tasks", vec!["T1", "T2"]),
            RawRecord::new("template", "t/a.yaml")
                .with_field("guid", "T1")
                .with_field("name", "Case Details"),
            RawRecord::new("formflow", "f/b.yaml")
                .with_field("guid", "F2")
                .with_field("name", "Close Case")
                .with_field("tasks", vec!["T1"]),
        ]
    }

    #[tokio::test]
    async fn test_find_dispatches_on_mode() {
        let graph = graph();

        let hits = find(&FindQuery::new("^close"), &graph).await.unwrap();
        assert_eq!(ids(&hits), vec!["F1", "T2"]);

        let query = FindQuery::new("close reason").with_mode(SearchMode::Exact);
        let hits = find(&query, &graph).await.unwrap();
        assert_eq!(ids(&hits), vec!["T2"]);
    }

    #[tokio::test]
    async fn test_find_order_stable_across_rebuilds() {
        let registry = registry();
        let first = GraphBuilder::new(&registry).build(&records()).graph;
        let second = GraphBuilder::new(&registry).build(&records()).graph;

        let mut modes = vec![SearchMode::Regex, SearchMode::Exact];
        #[cfg(feature = "fuzzy")]
        modes.push(SearchMode::Fuzzy);

        for mode in modes {
            let pattern = if mode == SearchMode::Exact { "close case" } else { "case" };
            let query = FindQuery::new(pattern).with_mode(mode);
            let a = find(&query, &first).await.unwrap();
            let b = find(&query, &second).await.unwrap();
            assert_eq!(ids(&a), ids(&b), "{:?}", mode);
        }

        let hits = find(&FindQuery::new("case"), &first).await.unwrap();
        assert_eq!(ids(&hits), vec!["F1", "F2", "F3", "T1", "T2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_share_one_graph() {
        let registry = registry();
        let graph = Arc::new(GraphBuilder::new(&registry).build(&records()).graph);

        let expected_hits = ids(&find(&FindQuery::new("^close"), &graph).await.unwrap())
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let reach_of = |graph: &Graph| -> Vec<String> {
            traverse(graph, &["F1"], Direction::Descendants, Depth::Unbounded)
                .unwrap()
                .node_ids()
                .into_iter()
                .map(String::from)
                .collect()
        };
        let expected_reach = reach_of(&graph);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let graph = Arc::clone(&graph);
            handles.push(tokio::spawn(async move {
                let query = FindQuery::new("^close");
                let (hits, reach) = tokio::join!(find(&query, &graph), async { reach_of(&graph) });
                let hits: Vec<String> = hits
                    .unwrap()
                    .into_iter()
                    .map(|h| h.node.id.as_str().to_string())
                    .collect();
                (hits, reach)
            }));
        }

        for handle in handles {
            let (hits, reach) = handle.await.unwrap();
            assert_eq!(hits, expected_hits);
            assert_eq!(reach, expected_reach);
        }
    }
}

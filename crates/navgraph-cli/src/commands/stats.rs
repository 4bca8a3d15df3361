//! Stats command

use std::collections::BTreeMap;

use serde::Serialize;

use crate::output::{to_json, OutputFormat};
use crate::AppContext;
use navgraph_core::DiagnosticsSummary;

#[derive(Debug, Serialize)]
struct StatsView<'a> {
    nodes: usize,
    edges: usize,
    types: BTreeMap<&'a str, usize>,
    relations: BTreeMap<&'a str, usize>,
    diagnostics: DiagnosticsSummary,
}

pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let graph = &ctx.graph;

    let mut relations = BTreeMap::new();
    for edge in graph.edges() {
        *relations.entry(edge.relation.as_str()).or_insert(0) += 1;
    }

    let stats = StatsView {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        types: graph.type_counts(),
        relations,
        diagnostics: ctx.diagnostics.summary(),
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&stats)?),
        OutputFormat::Table => {
            println!("Nodes: {}", stats.nodes);
            for (name, count) in &stats.types {
                println!("  {:<20} {}", name, count);
            }
            println!("Edges: {}", stats.edges);
            for (relation, count) in &stats.relations {
                println!("  {:<20} {}", relation, count);
            }
            println!("Diagnostics: {}", stats.diagnostics);
        }
    }

    Ok(())
}

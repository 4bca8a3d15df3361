//! Find command

use clap::Args;
use serde::Serialize;

use crate::output::{node_line, to_json, NodeView, OutputFormat};
use crate::AppContext;
use navgraph_core::{FindQuery, SearchMode};

#[derive(Args)]
pub struct FindArgs {
    /// Pattern (a regular expression unless --mode says otherwise)
    pub pattern: String,

    /// Filter by node type
    #[arg(short = 't', long)]
    pub r#type: Option<String>,

    /// Leave out a node type (can be used multiple times)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Match against the whole summary line instead of the name
    #[arg(long)]
    pub summary: bool,

    /// Match case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Search mode: regex, exact, fuzzy
    #[arg(long, default_value = "regex")]
    pub mode: SearchMode,

    /// Limit results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl FindArgs {
    pub fn query(&self, ctx: &AppContext) -> FindQuery {
        let mut query = FindQuery::new(&self.pattern)
            .with_mode(self.mode)
            .exclude_types(ctx.ignored_types(&self.ignore));
        if let Some(t) = &self.r#type {
            query = query.with_type(t);
        }
        if self.summary {
            query = query.match_summary();
        }
        if self.case_sensitive {
            query = query.case_sensitive();
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        query
    }
}

#[derive(Serialize)]
struct FindOutput<'a> {
    pattern: &'a str,
    count: usize,
    nodes: Vec<NodeView<'a>>,
}

pub async fn run(args: &FindArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let query = args.query(ctx);
    let hits = navgraph_search::find(&query, &ctx.graph).await?;

    tracing::info!("Find '{}' returned {} nodes", args.pattern, hits.len());

    // Hits are clones; display from the graph's own nodes
    let nodes: Vec<_> = hits
        .iter()
        .filter_map(|hit| ctx.graph.node(hit.node.id.as_str()))
        .collect();

    match ctx.format {
        OutputFormat::Json => {
            let output = FindOutput {
                pattern: &args.pattern,
                count: nodes.len(),
                nodes: nodes.iter().map(|n| NodeView::new(&ctx.graph, n)).collect(),
            };
            println!("{}", to_json(&output)?);
        }
        OutputFormat::Table => {
            if nodes.is_empty() {
                println!("No nodes match '{}'", args.pattern);
                return Ok(());
            }
            println!("Found {} nodes matching '{}':", nodes.len(), args.pattern);
            for node in nodes {
                println!(
                    "  {}",
                    node_line(&ctx.graph, node, ctx.display_fields(node.node_type.as_str()))
                );
            }
        }
    }

    Ok(())
}

//! Traverse command

use clap::Args;

use crate::output::{render_tree, to_json, OutputFormat};
use crate::AppContext;
use navgraph_core::{Depth, Direction, TraversalEngine, TraversalQuery};

#[derive(Args)]
pub struct TraverseArgs {
    /// Seed node ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Direction: ancestors or descendants
    #[arg(long, default_value = "descendants")]
    pub direction: Direction,

    /// Traversal depth: a number or "all" (default from config, else 1)
    #[arg(short, long)]
    pub depth: Option<Depth>,

    /// Only follow this relation (can be used multiple times)
    #[arg(short = 'r', long = "relation")]
    pub relations: Vec<String>,

    /// Leave out a node type (can be used multiple times)
    #[arg(long)]
    pub ignore: Vec<String>,
}

pub fn run(args: &TraverseArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let mut query = TraversalQuery::new(args.ids.iter().map(String::as_str))
        .with_direction(args.direction)
        .exclude_types(ctx.ignored_types(&args.ignore))
        .filter_relations(args.relations.clone());
    query.max_depth = match args.depth {
        Some(depth) => depth,
        None => ctx.config.depth()?,
    };

    let subgraph = TraversalEngine::execute(&query, &ctx.graph)?;

    tracing::info!(
        "Traversal reached {} nodes over {} edges",
        subgraph.nodes.len(),
        subgraph.edges.len()
    );

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&subgraph)?),
        OutputFormat::Table => println!("{}", render_tree(&ctx.graph, &subgraph)),
    }

    Ok(())
}

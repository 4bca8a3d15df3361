//! Show command: every match with its ancestors and descendants

use clap::Args;
use serde::Serialize;

use crate::output::{node_line, render_tree, to_json, NodeView, OutputFormat};
use crate::AppContext;
use navgraph_core::{Depth, Direction, FindQuery, Subgraph, TraversalEngine, TraversalQuery};

#[derive(Args)]
pub struct ShowArgs {
    /// Regular expression matched against node names
    pub pattern: String,

    /// Filter by node type
    #[arg(short = 't', long)]
    pub r#type: Option<String>,

    /// Traversal depth: a number or "all" (default from config, else 1)
    #[arg(short, long)]
    pub depth: Option<Depth>,

    /// Leave out a node type (can be used multiple times)
    #[arg(long)]
    pub ignore: Vec<String>,
}

#[derive(Serialize)]
struct ShowEntry<'a> {
    node: NodeView<'a>,
    ancestors: Subgraph,
    descendants: Subgraph,
}

pub async fn run(args: &ShowArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let ignored = ctx.ignored_types(&args.ignore);
    let depth = match args.depth {
        Some(depth) => depth,
        None => ctx.config.depth()?,
    };

    let mut query = FindQuery::new(&args.pattern).exclude_types(ignored.clone());
    if let Some(t) = &args.r#type {
        query = query.with_type(t);
    }
    let hits = navgraph_search::find(&query, &ctx.graph).await?;

    let mut entries = Vec::with_capacity(hits.len());
    for hit in &hits {
        let Some(node) = ctx.graph.node(hit.node.id.as_str()) else {
            continue;
        };
        let walk = |direction: Direction| {
            let mut traversal = TraversalQuery::new([node.id.as_str()])
                .with_direction(direction)
                .exclude_types(ignored.clone());
            traversal.max_depth = depth;
            TraversalEngine::execute(&traversal, &ctx.graph)
        };
        entries.push(ShowEntry {
            node: NodeView::new(&ctx.graph, node),
            ancestors: walk(Direction::Ancestors)?,
            descendants: walk(Direction::Descendants)?,
        });
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&entries)?),
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("No nodes match '{}'", args.pattern);
            }
            for entry in &entries {
                let Some(node) = ctx.graph.node(entry.node.id) else {
                    continue;
                };
                println!("{}", node_line(&ctx.graph, node, ctx.display_fields(entry.node.node_type)));
                println!("ancestors:");
                println!("{}", render_tree(&ctx.graph, &entry.ancestors));
                println!("descendants:");
                println!("{}", render_tree(&ctx.graph, &entry.descendants));
                println!();
            }
        }
    }

    Ok(())
}

//! Export command

use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use clap::Args;
use serde::Serialize;

use crate::output::NodeView;
use crate::AppContext;
use navgraph_core::{Diagnostics, Edge};

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Snapshot of a built graph for rendering layers
#[derive(Debug, Serialize)]
pub struct ExportData<'a> {
    pub version: &'static str,
    pub types: Vec<&'a str>,
    pub nodes: Vec<NodeView<'a>>,
    pub edges: &'a [Edge],
    pub diagnostics: &'a Diagnostics,
}

impl<'a> ExportData<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            version: "1.0",
            types: ctx.graph.types().collect(),
            nodes: ctx
                .graph
                .nodes()
                .iter()
                .map(|n| NodeView::new(&ctx.graph, n))
                .collect(),
            edges: ctx.graph.edges(),
            diagnostics: &ctx.diagnostics,
        }
    }
}

pub fn run_export(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Exporting graph");

    let export_data = ExportData::new(ctx);
    tracing::debug!(
        "Exporting {} nodes, {} edges",
        export_data.nodes.len(),
        export_data.edges.len()
    );
    let content = serde_json::to_string_pretty(&export_data)?;

    if let Some(ref path) = args.output {
        // Write with secure permissions (0o600 = owner read/write only)
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            let mut file = std::fs::File::create(path)?;
            file.write_all(content.as_bytes())?;
        }
        println!("Exported graph to {}", path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

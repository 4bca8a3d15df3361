//! Navgraph CLI - Command line interface for configuration reference graphs

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, diagnostics, find, io, show, stats, traverse};
use config::{default_config_path, Config};
use navgraph_core::{Diagnostics, Graph, GraphBuilder, SchemaRegistry};
use navgraph_source::{load_schema, FileSource, RecordSource};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "navgraph")]
#[command(author, version, about = "Navigate the reference graph of a configuration repository")]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, env = "NAVGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Schema file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "NAVGRAPH_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Data root that source globs are relative to
    #[arg(long, global = true, env = "NAVGRAPH_ROOT")]
    pub root: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show node and edge counts
    Stats,
    /// Find nodes by pattern
    Find(find::FindArgs),
    /// Show ancestors and descendants of matching nodes
    Show(show::ShowArgs),
    /// Traverse from node ids
    Traverse(traverse::TraverseArgs),
    /// Report dropped records and missing nodes
    Diagnostics(diagnostics::DiagnosticsArgs),
    /// Export the graph as JSON
    Export(io::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with the built graph
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
    pub registry: SchemaRegistry,
    pub graph: Graph,
    pub diagnostics: Diagnostics,
}

impl AppContext {
    pub async fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load(&cli.config_path());

        let format = match cli.format.as_deref().or(config.format.as_deref()) {
            Some(f) => f.parse().map_err(anyhow::Error::msg)?,
            None => OutputFormat::default(),
        };

        let Some(schema_path) = cli.schema.clone().or_else(|| config.schema.clone()) else {
            anyhow::bail!("No schema file. Pass --schema or run `navgraph config set schema <path>`.");
        };
        let root = cli
            .root
            .clone()
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| default_root(&schema_path));

        tracing::debug!("Using schema {:?} and data root {:?}", schema_path, root);

        let registry = load_schema(&schema_path).await?;
        let records = FileSource::new(&root).load_all(&registry).await?;
        let built = GraphBuilder::new(&registry).build(&records);

        tracing::info!(
            "Built graph: {} nodes, {} edges ({})",
            built.graph.node_count(),
            built.graph.edge_count(),
            built.diagnostics.summary()
        );

        Ok(Self {
            config,
            format,
            registry,
            graph: built.graph,
            diagnostics: built.diagnostics,
        })
    }

    /// Display fields configured for a node's type
    pub fn display_fields(&self, type_name: &str) -> &[String] {
        self.registry
            .get(type_name)
            .map(|s| s.display.as_slice())
            .unwrap_or(&[])
    }

    /// Ignored types from the flags plus the config file
    pub fn ignored_types(&self, extra: &[String]) -> Vec<String> {
        let mut types = self.config.ignore_types.clone();
        for t in extra {
            if !types.contains(t) {
                types.push(t.clone());
            }
        }
        types
    }
}

/// The schema file's directory, or the working directory
fn default_root(schema_path: &Path) -> PathBuf {
    schema_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting navgraph CLI");

    // Commands that need no graph
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, &cli).await,
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let ctx = AppContext::new(&cli).await?;

    match &cli.command {
        Commands::Stats => stats::run(&ctx)?,
        Commands::Find(args) => find::run(args, &ctx).await?,
        Commands::Show(args) => show::run(args, &ctx).await?,
        Commands::Traverse(args) => traverse::run(args, &ctx)?,
        Commands::Diagnostics(args) => diagnostics::run(args, &ctx)?,
        Commands::Export(args) => io::run_export(args, &ctx)?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}

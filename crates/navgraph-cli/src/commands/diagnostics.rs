//! Diagnostics command: dropped records, duplicates and missing nodes

use clap::Args;

use crate::output::{to_json, OutputFormat};
use crate::AppContext;

#[derive(Args)]
pub struct DiagnosticsArgs {
    /// Exit with an error unless the build was clean
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &DiagnosticsArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let diagnostics = &ctx.diagnostics;

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(diagnostics)?),
        OutputFormat::Table => {
            println!("{}", diagnostics.summary());

            if !diagnostics.dropped_records.is_empty() {
                println!("\nDropped records:");
                for err in &diagnostics.dropped_records {
                    println!("  {}", err);
                }
            }

            if !diagnostics.duplicates.is_empty() {
                println!("\nDuplicate ids:");
                for dup in &diagnostics.duplicates {
                    println!(
                        "  {}: kept {} ({}), dropped {} ({})",
                        dup.id, dup.kept_type, dup.kept_origin, dup.dropped_type, dup.dropped_origin
                    );
                }
            }

            let dangling: Vec<_> = diagnostics.dangling().collect();
            if !dangling.is_empty() {
                println!("\nMissing nodes:");
                for missing in dangling {
                    let hint = missing
                        .type_hint
                        .as_ref()
                        .map(|t| format!(" ({})", t))
                        .unwrap_or_default();
                    println!("  {} -[{}]-> {}{}", missing.from, missing.relation, missing.target, hint);
                }
            }

            if !diagnostics.ignored_matches.is_empty() {
                println!("\nIgnored matches:");
                for ignored in &diagnostics.ignored_matches {
                    println!("  {} [{}]: {}", ignored.from, ignored.matcher, ignored.text);
                }
            }
        }
    }

    if args.strict && !diagnostics.is_clean() {
        anyhow::bail!("Build has problems: {}", diagnostics.summary());
    }
    Ok(())
}

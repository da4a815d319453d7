//! Corpnet CLI
//!
//! Command-line interface for:
//! - Building corporation- and officer-granularity networks from a directory
//!   of leaked registry records (`build`)
//! - Summarizing an existing GEXF file, including layout-annotated ones
//!   coming back from Gephi (`inspect`)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod build;
mod inspect;

#[derive(Parser)]
#[command(name = "corpnet")]
#[command(
    author,
    version,
    about = "Corporate-registry network builder (GEXF out, Gephi-ready)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build networks from a directory of company JSON records.
    Build {
        /// Directory containing one JSON record per company
        input: PathBuf,
        /// Directory to write graphs and sidecars to
        #[arg(short, long)]
        out_dir: PathBuf,
        /// Which networks to build: corporations|officers|both
        #[arg(long, default_value = "both")]
        granularity: String,
        /// Keep every component instead of only the largest connected one
        #[arg(long)]
        keep_all: bool,
        /// Skip the attribute-table and edge-list JSON sidecars
        #[arg(long)]
        no_sidecars: bool,
    },

    /// Summarize a GEXF file (node/edge counts, top-degree nodes, layout state).
    Inspect {
        /// GEXF file to read
        graph: PathBuf,
        /// How many top-degree nodes to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            input,
            out_dir,
            granularity,
            keep_all,
            no_sidecars,
        } => build::run(
            &input,
            &out_dir,
            build::Granularity::parse(&granularity)?,
            build::BuildFlags {
                keep_all,
                sidecars: !no_sidecars,
            },
        ),
        Commands::Inspect { graph, top } => inspect::run(&graph, top),
    }
}

//! swingkit CLI - Command-line tools for swing bone parameter files
//!
//! This binary provides commands for validating, reformatting, and
//! restructuring a game's swing physics parameter XML.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use swingkit_cli::commands;

/// swingkit - Swing bone parameter tooling
#[derive(Parser)]
#[command(name = "swingkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every hash reference against a label CSV
    Validate {
        /// Path to the swing parameter XML file
        #[arg(short, long)]
        file: String,

        /// Path to the label CSV (hash, label)
        #[arg(short, long)]
        labels: String,
    },

    /// Re-serialize a file into the canonical layout
    Fmt {
        /// Path to the swing parameter XML file
        #[arg(short, long)]
        file: String,

        /// Output path (default: rewrite in place)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect a label CSV or look up the closest labels to a query
    Labels {
        /// Path to the label CSV (hash, label)
        #[arg(short, long)]
        labels: String,

        /// Name to look up; omit for partition statistics
        #[arg(short, long)]
        query: Option<String>,

        /// Number of closest matches to print
        #[arg(short, long, default_value_t = 5)]
        n: usize,
    },

    /// Generate collision groups for every chain in a file
    Groups {
        /// Path to the swing parameter XML file
        #[arg(short, long)]
        file: String,

        /// Label CSV used to repair unknown group names
        #[arg(short, long)]
        labels: Option<String>,

        /// Output path (default: rewrite in place)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Copy a swing bone chain from one file into another
    Transfer {
        /// Source swing parameter XML file
        #[arg(short, long)]
        source: String,

        /// Target swing parameter XML file
        #[arg(short, long)]
        target: String,

        /// Name of the chain to transfer
        #[arg(short, long)]
        chain: String,

        /// Also transfer the chain's collision groups and shapes
        #[arg(long)]
        with_shapes: bool,

        /// Output path (default: rewrite the target in place)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file, labels } => commands::validate::run(&file, &labels),
        Commands::Fmt { file, output } => commands::fmt::run(&file, output.as_deref()),
        Commands::Labels { labels, query, n } => {
            commands::labels::run(&labels, query.as_deref(), n)
        }
        Commands::Groups {
            file,
            labels,
            output,
        } => commands::groups::run(&file, labels.as_deref(), output.as_deref()),
        Commands::Transfer {
            source,
            target,
            chain,
            with_shapes,
            output,
        } => commands::transfer::run(&source, &target, &chain, with_shapes, output.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

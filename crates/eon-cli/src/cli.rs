//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Interactive timeline data tool.
///
/// Imports and exports categorized timeline events as CSV or YAML, resolves
/// parent/child references, and inspects lane assignment and axis layout.
#[derive(Debug, Parser)]
#[command(name = "eon", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a CSV or YAML file and report what was ingested.
    Import {
        /// File to import; format inferred from the extension.
        file: PathBuf,

        /// Emit a machine-readable JSON summary.
        #[arg(long)]
        json: bool,
    },

    /// Convert between CSV and YAML.
    Convert {
        /// Input file; format inferred from the extension.
        input: PathBuf,

        /// Output file; format inferred from the extension.
        output: PathBuf,
    },

    /// Verify the export/import round trip.
    Check {
        /// File to verify; omitted runs the built-in sample datasets.
        file: Option<PathBuf>,

        /// Format to push the data through (csv or yaml).
        #[arg(long)]
        format: Option<String>,

        /// Emit the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show per-category lane assignments.
    Rows {
        /// File to load.
        file: PathBuf,
    },

    /// Show the axis layout for a dataset's span.
    Axis {
        /// File to load.
        file: PathBuf,
    },

    /// List events with their resolved parents.
    List {
        /// File to load.
        file: PathBuf,
    },
}

//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `frozen-uuids`.
#[derive(Debug, Parser)]
#[command(
    name = "frozen-uuids",
    version,
    about = "Preview and validate frozen UUID configurations"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the UUIDs a configuration would hand out.
    Preview {
        /// Strategy: auto_increment, cycle, random or values.
        #[arg(long)]
        side_effect: Option<String>,
        /// Seed for the random strategy.
        #[arg(long, allow_hyphen_values = true)]
        seed: Option<i64>,
        /// Version stamped on random UUIDs (1-5).
        #[arg(long = "uuid-version")]
        version: Option<u8>,
        /// Predefined UUID; repeat for several.
        #[arg(long = "value")]
        values: Vec<String>,
        /// Number of UUIDs to print.
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
    /// Check a YAML or JSON overrides file and print the resolved configuration.
    Validate {
        /// Path to the overrides file.
        file: PathBuf,
    },
    /// Print the marker registration line.
    Marker,
}

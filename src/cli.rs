//! CLI argument definitions for labqc.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labqc")]
#[command(version)]
#[command(about = "QC classification and bounds checking for lab analysis batches", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    labqc run export.csv              Print QC, Samples, and Reported Results\n    labqc run export.csv --format csv --output results/\n    labqc config show                 Show the effective configuration"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one batch of measurement rows
    Run {
        /// Input file (.csv, .json, .yaml)
        input: PathBuf,
        /// Config file, applied over ~/.config/labqc/config.yaml and ./labqc.yaml
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Output format (text, json, csv, markdown)
        #[arg(long, short, default_value = "text")]
        format: String,
        /// Write output to a file; for csv, a directory receives one file per result set
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Override the molecular weight used for the µmol/L conversion
        #[arg(long, value_name = "G_PER_MOL")]
        molecular_weight: Option<f64>,
        /// Exit with an error if any group could not be computed
        #[arg(long)]
        strict: bool,
    },
    /// Show the category of one or more sample ids
    Classify {
        /// Sample ids to classify
        #[arg(required = true)]
        ids: Vec<String>,
        /// Config file with custom category rules
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show version information
    Version {
        /// Show commit and build date
        #[arg(long)]
        build: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration as YAML
    Show {
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Check the merged configuration and report problems
    Validate {
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

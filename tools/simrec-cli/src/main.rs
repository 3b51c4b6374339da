//! simrec Command Line Interface
//!
//! Loads an entity matrix from a JSON document and runs one similarity
//! operation on it.

mod commands;
mod config;
mod error;
mod input;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::commands::{all_pairs, inspect, similar, top_k};
use crate::config::{CliConfig, Settings};
use crate::error::Result;

/// simrec Command Line Interface
///
/// Exact cosine similarity and top-K neighbors over user/item vectors.
#[derive(Parser, Debug)]
#[command(name = "simrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SIMREC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Compute at native precision instead of narrowing to 16 bits
    #[arg(long, global = true)]
    pub no_cast: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show shape, element kind and memory footprint of a matrix
    Inspect {
        /// Path to the matrix document
        matrix: PathBuf,
    },

    /// Score one row against every row
    Similar {
        /// Path to the matrix document
        matrix: PathBuf,

        /// Row to score
        #[arg(short, long)]
        row: usize,
    },

    /// Cosine similarity between every pair of rows
    AllPairs {
        /// Path to the matrix document
        matrix: PathBuf,
    },

    /// Top-K most similar rows for every row
    TopK {
        /// Path to the matrix document
        matrix: PathBuf,

        /// Number of neighbors per row
        #[arg(short)]
        k: Option<usize>,

        /// Leave each row out of its own neighbor list
        #[arg(long)]
        exclude_self: bool,

        /// Fail on rows with zero norm instead of ranking them last
        #[arg(long)]
        reject_zero_norm: bool,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("simrec=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let file_config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    let settings = Settings::resolve(file_config, &cli);

    match cli.command {
        Commands::Inspect { matrix } => inspect::run(&matrix, &settings),
        Commands::Similar { matrix, row } => similar::run(&matrix, row, &settings),
        Commands::AllPairs { matrix } => all_pairs::run(&matrix, &settings),
        Commands::TopK { matrix, k, exclude_self, reject_zero_norm } => {
            let config = settings.top_k_config(k, exclude_self, reject_zero_norm);
            top_k::run(&matrix, config, &settings)
        }
    }
}

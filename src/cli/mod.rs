//! Assessor command line interface.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::strategies::StrategyKind;
use crate::types::config::DEFAULT_CONFIG_FILE;

/// Upper bound of `evaluate --repeat`.
pub const MAX_REPEAT: i64 = 1000;

/// Assessor - evaluate documents with cached scoring strategies.
#[derive(Parser, Debug)]
#[command(name = "assessor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default configuration file.
    Init {
        /// Target directory (defaults to the current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Evaluates a document through the configured chain.
    Evaluate(EvaluateArgs),

    /// Lists the available strategies.
    Strategies,

    /// Shows the version.
    Version,
}

/// Arguments of `assessor evaluate`.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// File holding the document content.
    #[arg(short, long, conflicts_with = "content")]
    pub file: Option<PathBuf>,

    /// Document content given inline.
    #[arg(long)]
    pub content: Option<String>,

    /// Document title (defaults to the file name).
    #[arg(short, long)]
    pub title: Option<String>,

    /// Submission identifier (generated when absent).
    #[arg(long)]
    pub id: Option<String>,

    /// Author identifier.
    #[arg(short, long, default_value = "anonymous")]
    pub author: String,

    /// Strategy to use (rule_based, peer_review, ml). Overrides the config.
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    /// How many times to evaluate the same document.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_REPEAT)
    )]
    pub repeat: u32,

    /// Cache time to live in seconds. Overrides the config.
    #[arg(long, allow_hyphen_values = true)]
    pub ttl: Option<i64>,

    /// Simulated latency in milliseconds. Overrides the config.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

//! Command-line interface for the ingestion daemon.

use clap::Parser;
use std::path::PathBuf;

/// testsink - watches a test-station directory and loads XML reports into
/// the QA database.
#[derive(Parser, Debug)]
#[command(name = "testsink-daemon")]
#[command(about = "Watches a directory for station XML reports and loads them into SQLite")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/testsink/config.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directory to watch for new report files (overrides config file)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory for per-report export paths (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// SQLite database path (overrides config file)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

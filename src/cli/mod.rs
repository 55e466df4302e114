//! CLI interface for sports-lines
//!
//! Provides subcommands for:
//! - `run`: Start ingestion and serve subscription streams
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sports-lines")]
#[command(about = "Sports line ingestion and per-subscription delta streaming")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start ingestion and the stream server
    Run(RunArgs),
    /// Show configuration
    Config,
}

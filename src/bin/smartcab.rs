//! Smartcab CLI - Train and inspect the Q-learning driving agent
//!
//! This CLI provides a unified interface for:
//! - Running training sessions in the grid world
//! - Inspecting saved tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartcab")]
#[command(version, about = "Q-learning smartcab simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the driving agent in the grid world
    Run(Box<smartcab::cli::commands::run::RunArgs>),

    /// Summarize a saved table
    Inspect(smartcab::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => smartcab::cli::commands::run::execute(*args),
        Commands::Inspect(args) => smartcab::cli::commands::inspect::execute(args),
    }
}

//! CLI application for extracting invoice records from PDF files.

mod commands;
mod settings;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::extract;

/// Extract invoice details from PDF files with a local language model
/// and store them in SQLite.
#[derive(Parser)]
#[command(name = "invex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PDF file, or a directory containing PDF files
    path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging is controlled by RUST_LOG, warnings by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let Some(path) = cli.path else {
        println!("{}", Cli::command().render_usage());
        return Ok(());
    };

    extract::run(&path)
}

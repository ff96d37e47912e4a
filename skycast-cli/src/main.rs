//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering provider payloads for humans
//! - The file-backed attempt log

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;
mod sink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in a .env file next to the working directory.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

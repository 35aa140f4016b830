//! Binary crate for the `weather-dashboard` tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the dashboard page and JSON API
//! - Rendering observations as HTML

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

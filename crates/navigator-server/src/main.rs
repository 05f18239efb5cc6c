//! Navigator server binary
//!
//! Starts the HTTP server for document extraction, pipeline questions,
//! chat and index search.

use anyhow::{Context, Result};
use clap::Parser;
use navigator_server::{config::NavigatorConfig, start_server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Navigator - schema-blind access to a remote AI platform
#[derive(Parser, Debug)]
#[command(name = "navigator-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "NAVIGATOR_CONFIG", default_value = "config/navigator.toml")]
    config: PathBuf,

    /// Override the configured bind port
    #[arg(short, long, env = "NAVIGATOR_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = NavigatorConfig::from_file(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    start_server(config).await.context("Navigator server stopped")?;

    Ok(())
}

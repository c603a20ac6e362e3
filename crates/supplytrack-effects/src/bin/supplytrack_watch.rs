//! Notification watcher CLI
//!
//! Connects to an inventory server's notification channel and prints
//! restock toasts to the terminal until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use supplytrack_core::NotifyConfig;
use supplytrack_effects::{shutdown_on, EventLoop, TerminalSurface};
use tokio::runtime::Handle;
use tracing::info;

#[derive(Parser)]
#[command(name = "supplytrack-watch")]
#[command(about = "SupplyTrack - Real-time restock notification watcher", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page origin, e.g. https://shop.example.com (overrides the config file)
    #[arg(long)]
    origin: Option<String>,

    /// JSON file of page flashes to show on startup
    #[arg(long)]
    flashes: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mut config = match &cli.config {
        Some(path) => NotifyConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NotifyConfig::default(),
    };
    if let Some(origin) = cli.origin {
        config.origin = origin;
    }
    config.validate().context("invalid configuration")?;

    let surface = TerminalSurface::new(std::io::stdout());
    let mut event_loop = EventLoop::new(&config, surface, Handle::current())?;
    info!(endpoint = %event_loop.client().endpoint(), "Watching for notifications");

    if let Some(path) = &cli.flashes {
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("reading flashes from {}", path.display()))?;
        event_loop.client_mut().render_flashes(&payload)?;
    }

    event_loop
        .run_until(shutdown_on(tokio::signal::ctrl_c()))
        .await;

    let client = event_loop.client();
    info!(
        stats = %serde_json::to_string(&client.stats())?,
        reconnect = %serde_json::to_string(&client.supervisor().stats())?,
        pending = client.store().pending_count(),
        "Notification watcher stopped"
    );
    Ok(())
}

//! CRLauncher - Lightweight Cosmic Reach Launcher
//!
//! Entry point for CLI and GUI modes.

use clap::Parser;
use crlauncher::cli::{self, Args};
use crlauncher::config::SettingsStore;
use crlauncher::core::instance::InstanceManager;
use crlauncher::gui;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let settings = SettingsStore::load()?;

    // Handle subcommands first
    if let Some(command) = args.command {
        return cli::handle_command(command, &settings);
    }

    if args.list {
        cli::list_instances(&InstanceManager::new())?;
    } else {
        // GUI mode: Start the launcher UI
        tracing::info!("Starting CRLauncher GUI");
        gui::run(settings)?;
    }

    Ok(())
}

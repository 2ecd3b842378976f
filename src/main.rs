//! CLI entry point for the station-links tool.

use anyhow::Result;
use clap::Parser;
use station_links_core::AuditLog;
use tracing::{debug, info};

mod app_config;
mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?cli, "CLI arguments parsed");

    let loaded_config = app_config::load_config(cli.config.as_deref())?;
    if loaded_config.loaded_from_file {
        debug!(path = ?loaded_config.path, "Loaded config file");
    }

    // One audit log per run; every stage reports through it.
    let audit = AuditLog::with_tracing();

    match &cli.command {
        Command::FetchSheet(args) => {
            commands::run_fetch_sheet_command(args, &loaded_config.config).await?;
        }
        Command::BuildLookup(args) => {
            commands::run_build_lookup_command(args, &loaded_config.config, &audit).await?;
        }
        Command::Merge(args) => {
            commands::run_merge_command(args, &audit)?;
        }
        Command::ShowConfig => {
            commands::run_config_show_command(&loaded_config)?;
        }
    }

    info!(events = audit.events().len(), "station-links finished");
    Ok(())
}

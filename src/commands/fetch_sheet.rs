//! Fetch-sheet command handler: download the published coverage sheet.

use anyhow::{Context, Result, bail};
use station_links_core::build_http_client;
use station_links_core::sheet::{download_sheet, export_url};
use tracing::info;

use super::ensure_parent_dir;
use crate::app_config::FileConfig;
use crate::cli::FetchSheetArgs;

pub async fn run_fetch_sheet_command(args: &FetchSheetArgs, config: &FileConfig) -> Result<()> {
    let Some(sheet_key) = args
        .sheet_key
        .as_deref()
        .or(config.sheet_key.as_deref())
        .filter(|key| !key.trim().is_empty())
    else {
        bail!(
            "No spreadsheet key configured.\n  Suggestion: pass --sheet-key or set `sheet_key` in the config file"
        );
    };

    let url = export_url(sheet_key);
    let client = build_http_client(config.http_settings(&args.http))?;
    ensure_parent_dir(&args.output)?;

    info!(url = %url, "Downloading coverage sheet");
    let bytes = download_sheet(&client, &url, &args.output)
        .await
        .context("Could not download the coverage sheet")?;

    println!("Saved {bytes} bytes to {}", args.output.display());
    Ok(())
}

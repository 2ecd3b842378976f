//! Build-lookup command handler: coverage CSV → ISBN lookup table JSON.

use anyhow::Result;
use station_links_core::tabular::read_coverage_file;
use station_links_core::{AuditLog, HttpTitleFetcher, PipelineEvent, build_lookup_table};
use tracing::info;

use super::ensure_parent_dir;
use crate::app_config::FileConfig;
use crate::cli::BuildLookupArgs;

pub async fn run_build_lookup_command(
    args: &BuildLookupArgs,
    config: &FileConfig,
    audit: &AuditLog,
) -> Result<()> {
    let mut columns = config.coverage_columns();
    if let Some(isbn) = &args.isbn_column {
        columns.isbn.clone_from(isbn);
    }
    if let Some(station) = &args.station_column {
        columns.station_name.clone_from(station);
    }
    if let Some(url) = &args.url_column {
        columns.url.clone_from(url);
    }
    if args.no_headline {
        columns.headline = None;
    } else if let Some(headline) = &args.headline_column {
        columns.headline = Some(headline.clone());
    }
    let policy = args
        .on_fetch_failure
        .or(config.on_fetch_failure)
        .unwrap_or_default();

    let records = read_coverage_file(&args.input, &columns)?;
    info!(rows = records.len(), input = %args.input.display(), "Read coverage sheet");

    let fetcher = HttpTitleFetcher::new(config.http_settings(&args.http))?;
    let table = build_lookup_table(records, &fetcher, policy, audit).await;

    ensure_parent_dir(&args.output)?;
    table.save(&args.output)?;

    let fetch_failures = audit.count(|event| matches!(event, PipelineEvent::FetchFailed { .. }));
    let skipped = audit.count(|event| matches!(event, PipelineEvent::RowSkipped { .. }));
    println!(
        "Wrote {} links for {} ISBNs to {} ({} rows without ISBN, {} title fetch failures, policy: {})",
        table.link_count(),
        table.len(),
        args.output.display(),
        skipped,
        fetch_failures,
        policy
    );
    Ok(())
}

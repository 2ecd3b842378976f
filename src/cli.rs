//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use station_links_core::FetchFailurePolicy;

/// Default path of the downloaded coverage sheet.
pub const DEFAULT_COVERAGE_CSV: &str = "data/external_links.csv";
/// Default path of the books sheet export.
pub const DEFAULT_BOOKS_CSV: &str = "data/books.csv";
/// Default path of the ISBN lookup table.
pub const DEFAULT_LOOKUP_JSON: &str = "data/external_links_by_isbn.json";
/// Default path of the merge output.
pub const DEFAULT_MERGED_CSV: &str = "data/external_links_to_merge.csv";

/// Merge member station coverage links into the books spreadsheet.
///
/// Run `fetch-sheet`, `build-lookup`, and `merge` in order; each stage reads
/// the previous stage's file.
#[derive(Parser, Debug)]
#[command(name = "station-links")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/station-links/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline stages.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the published coverage spreadsheet as CSV
    FetchSheet(FetchSheetArgs),
    /// Build the ISBN lookup table from the coverage CSV
    BuildLookup(BuildLookupArgs),
    /// Merge coverage links into the books CSV and audit unused coverage
    Merge(MergeArgs),
    /// Print the effective configuration
    ShowConfig,
}

/// HTTP timeout overrides shared by networked stages.
#[derive(Args, Debug, Clone, Default)]
pub struct HttpArgs {
    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Total request timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,
}

/// Arguments for `fetch-sheet`.
#[derive(Args, Debug, Clone)]
pub struct FetchSheetArgs {
    /// Published spreadsheet key (overrides `sheet_key` in config)
    #[arg(long)]
    pub sheet_key: Option<String>,

    /// Where to write the CSV
    #[arg(short, long, default_value = DEFAULT_COVERAGE_CSV)]
    pub output: PathBuf,

    #[command(flatten)]
    pub http: HttpArgs,
}

/// Arguments for `build-lookup`.
#[derive(Args, Debug, Clone)]
pub struct BuildLookupArgs {
    /// Coverage CSV to read
    #[arg(short, long, default_value = DEFAULT_COVERAGE_CSV)]
    pub input: PathBuf,

    /// Lookup table JSON to write
    #[arg(short, long, default_value = DEFAULT_LOOKUP_JSON)]
    pub output: PathBuf,

    /// What to do when a page title cannot be fetched: skip or empty
    #[arg(long, value_name = "POLICY")]
    pub on_fetch_failure: Option<FetchFailurePolicy>,

    /// Ignore any headline column and fetch every link title
    #[arg(long)]
    pub no_headline: bool,

    /// Coverage column holding the ISBN
    #[arg(long)]
    pub isbn_column: Option<String>,

    /// Coverage column holding the station name
    #[arg(long)]
    pub station_column: Option<String>,

    /// Coverage column holding the link URL
    #[arg(long)]
    pub url_column: Option<String>,

    /// Coverage column holding the headline
    #[arg(long, conflicts_with = "no_headline")]
    pub headline_column: Option<String>,

    #[command(flatten)]
    pub http: HttpArgs,
}

/// Arguments for `merge`.
#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Books CSV exported from the books spreadsheet
    #[arg(short, long, default_value = DEFAULT_BOOKS_CSV)]
    pub books: PathBuf,

    /// Lookup table JSON written by `build-lookup`
    #[arg(short, long, default_value = DEFAULT_LOOKUP_JSON)]
    pub lookup: PathBuf,

    /// Merge CSV to write
    #[arg(short, long, default_value = DEFAULT_MERGED_CSV)]
    pub output: PathBuf,
}

//! Merge command handler: books CSV + lookup table → merge CSV and audit.

use anyhow::Result;
use station_links_core::tabular::{read_books_file, write_merged_file};
use station_links_core::{LookupTable, Reporter, merge_links};

use super::ensure_parent_dir;
use crate::cli::MergeArgs;

pub fn run_merge_command(args: &MergeArgs, reporter: &dyn Reporter) -> Result<()> {
    // Read both inputs before touching the output so a schema error leaves no partial file.
    let table = LookupTable::load(&args.lookup)?;
    let books = read_books_file(&args.books)?;

    let outcome = merge_links(&books, &table, reporter);

    ensure_parent_dir(&args.output)?;
    write_merged_file(&args.output, &outcome.records)?;

    println!(
        "Merged {} books ({} with coverage) into {}",
        outcome.records.len(),
        outcome.matched_books(),
        args.output.display()
    );
    if !outcome.unmatched_keys.is_empty() {
        println!(
            "{} coverage ISBNs matched no book: {}",
            outcome.unmatched_keys.len(),
            outcome.unmatched_keys.join(", ")
        );
    }
    Ok(())
}

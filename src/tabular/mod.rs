//! Delimited-text adapters for the coverage sheet, books sheet, and merge file.
//!
//! Header matching is whitespace-trimmed and case-insensitive for both
//! inputs, so `" ISBN "` in a spreadsheet export still satisfies a mapping
//! that names `isbn`. Cell values are passed through untouched.

mod headers;

pub use headers::HeaderIndex;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::{debug, instrument};

use crate::coverage::CoverageRecord;
use crate::error::PipelineError;
use crate::merge::{BookRecord, MergedRecord};

/// Columns every books export must have.
pub const BOOK_TITLE_COLUMN: &str = "title";
/// Books export ISBN column.
pub const BOOK_ISBN_COLUMN: &str = "isbn";

/// Header row of the merge output, in order.
pub const MERGED_COLUMNS: [&str; 3] = ["title", "isbn", "external_links_html"];

/// Which coverage sheet headers hold which fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageColumns {
    /// ISBN column (required).
    pub isbn: String,
    /// Station name column (required).
    pub station_name: String,
    /// Coverage URL column (required).
    pub url: String,
    /// Headline column. When `None`, or absent from the file, every title is fetched.
    pub headline: Option<String>,
    /// Book title column, used only in diagnostics.
    pub book_title: Option<String>,
}

impl Default for CoverageColumns {
    fn default() -> Self {
        Self {
            isbn: "ISBN".to_string(),
            station_name: "Station name".to_string(),
            url: "URL".to_string(),
            headline: Some("Headline".to_string()),
            book_title: Some("Book title".to_string()),
        }
    }
}

/// Reads coverage records from delimited text.
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] if a required column is missing and
/// [`PipelineError::Csv`] if the text is malformed.
#[instrument(skip(reader, columns))]
pub fn read_coverage<R: Read>(
    reader: R,
    source_name: &str,
    columns: &CoverageColumns,
) -> Result<Vec<CoverageRecord>, PipelineError> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = HeaderIndex::from_record(
        csv_reader
            .headers()
            .map_err(|source| PipelineError::csv(source_name, source))?,
    );

    let isbn = headers.require(&columns.isbn, source_name)?;
    let station_name = headers.require(&columns.station_name, source_name)?;
    let url = headers.require(&columns.url, source_name)?;
    let headline = optional_column(&headers, columns.headline.as_deref());
    let book_title = optional_column(&headers, columns.book_title.as_deref());

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|source| PipelineError::csv(source_name, source))?;
        records.push(CoverageRecord {
            isbn: cell(&row, isbn),
            station_name: cell(&row, station_name),
            url: cell(&row, url),
            headline: headline.map(|index| cell(&row, index)),
            book_title: book_title.map(|index| cell(&row, index)),
        });
    }

    debug!(
        rows = records.len(),
        has_headline = headline.is_some(),
        "read coverage rows"
    );
    Ok(records)
}

/// Reads coverage records from a CSV file.
///
/// # Errors
///
/// See [`read_coverage`]; also [`PipelineError::Io`] if the file cannot be opened.
pub fn read_coverage_file(
    path: &Path,
    columns: &CoverageColumns,
) -> Result<Vec<CoverageRecord>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::io(path, source))?;
    read_coverage(file, &path.display().to_string(), columns)
}

/// Reads book records from delimited text. Columns other than `title` and
/// `isbn` are ignored.
///
/// # Errors
///
/// Returns [`PipelineError::Schema`] if `title` or `isbn` is missing and
/// [`PipelineError::Csv`] if the text is malformed.
#[instrument(skip(reader))]
pub fn read_books<R: Read>(reader: R, source_name: &str) -> Result<Vec<BookRecord>, PipelineError> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = HeaderIndex::from_record(
        csv_reader
            .headers()
            .map_err(|source| PipelineError::csv(source_name, source))?,
    );

    let title = headers.require(BOOK_TITLE_COLUMN, source_name)?;
    let isbn = headers.require(BOOK_ISBN_COLUMN, source_name)?;

    let books = csv_reader
        .records()
        .map(|row| {
            let row = row.map_err(|source| PipelineError::csv(source_name, source))?;
            Ok(BookRecord {
                title: cell(&row, title),
                isbn: cell(&row, isbn),
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    debug!(rows = books.len(), "read book rows");
    Ok(books)
}

/// Reads book records from a CSV file.
///
/// # Errors
///
/// See [`read_books`]; also [`PipelineError::Io`] if the file cannot be opened.
pub fn read_books_file(path: &Path) -> Result<Vec<BookRecord>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::io(path, source))?;
    read_books(file, &path.display().to_string())
}

/// Writes merged records with a `title,isbn,external_links_html` header.
///
/// The header is written even when there are no records.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] if writing fails.
pub fn write_merged<W: Write>(
    writer: W,
    target_name: &str,
    records: &[MergedRecord],
) -> Result<(), PipelineError> {
    let mut csv_writer = Writer::from_writer(writer);
    let wrap = |source| PipelineError::csv(target_name, source);

    csv_writer.write_record(MERGED_COLUMNS).map_err(wrap)?;
    for record in records {
        csv_writer
            .write_record([
                record.title.as_str(),
                record.isbn.as_str(),
                record.external_links_html.as_str(),
            ])
            .map_err(wrap)?;
    }
    csv_writer
        .flush()
        .map_err(|source| PipelineError::csv(target_name, source.into()))?;
    Ok(())
}

/// Writes merged records to a CSV file, replacing it if present.
///
/// # Errors
///
/// See [`write_merged`]; also [`PipelineError::Io`] if the file cannot be created.
pub fn write_merged_file(path: &Path, records: &[MergedRecord]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|source| PipelineError::io(path, source))?;
    write_merged(file, &path.display().to_string(), records)?;
    debug!(path = %path.display(), rows = records.len(), "merge file written");
    Ok(())
}

fn optional_column(headers: &HeaderIndex, name: Option<&str>) -> Option<usize> {
    let name = name?;
    let index = headers.position(name);
    if index.is_none() {
        debug!(column = name, "optional coverage column not present");
    }
    index
}

fn cell(row: &StringRecord, index: usize) -> String {
    row.get(index).unwrap_or_default().to_string()
}

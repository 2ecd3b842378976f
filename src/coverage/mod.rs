//! Coverage normalization: station-submitted links → ISBN lookup table.
//!
//! Each coverage record becomes one rendered link filed under its raw ISBN.
//! The link title is the record's headline when the sheet has one, otherwise
//! the `<title>` of the linked page.
//!
//! # Architecture
//!
//! - [`CoverageRecord`] - One row of the coverage sheet
//! - [`FetchFailurePolicy`] - What to do when a page title cannot be fetched
//! - [`TitleFetcher`] - Async seam for title lookups ([`HttpTitleFetcher`] in production)
//! - [`build_lookup_table`] - The normalizer itself

mod link;
mod title;

pub use link::render_link;
pub use title::{FetchError, HttpTitleFetcher, TitleFetcher, extract_title};

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, instrument};

use crate::lookup::LookupTable;
use crate::report::{PipelineEvent, Reporter};

/// One station's claim of having covered a book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageRecord {
    /// ISBN as typed into the coverage form.
    pub isbn: String,
    /// Member station name.
    pub station_name: String,
    /// Link to the station's coverage.
    pub url: String,
    /// Headline for the link; `None` when the sheet has no headline column.
    pub headline: Option<String>,
    /// Book title as typed into the coverage form, for diagnostics only.
    pub book_title: Option<String>,
}

impl CoverageRecord {
    /// The headline, if present and non-empty.
    #[must_use]
    pub fn usable_headline(&self) -> Option<&str> {
        self.headline
            .as_deref()
            .map(str::trim)
            .filter(|headline| !headline.is_empty())
    }
}

/// Handling for records whose page title could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchFailurePolicy {
    /// Leave the record out of the lookup table.
    #[default]
    Skip,
    /// Keep the record, rendered with an empty title.
    EmitEmpty,
}

impl FetchFailurePolicy {
    /// Stable label used in config files and CLI flags.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::EmitEmpty => "empty",
        }
    }
}

impl fmt::Display for FetchFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "empty" | "emit_empty" | "emit-empty" => Ok(Self::EmitEmpty),
            other => Err(format!(
                "unknown fetch failure policy '{other}' (expected 'skip' or 'empty')"
            )),
        }
    }
}

/// Builds the ISBN lookup table from coverage records.
///
/// Records are processed strictly in order, one title fetch at a time, so
/// links under each ISBN keep input order. Rows with an empty ISBN are
/// skipped. Fetch failures are reported and handled per `policy`; they never
/// fail the build.
#[instrument(skip_all, fields(policy = %policy))]
pub async fn build_lookup_table<I>(
    records: I,
    fetcher: &dyn TitleFetcher,
    policy: FetchFailurePolicy,
    reporter: &dyn Reporter,
) -> LookupTable
where
    I: IntoIterator<Item = CoverageRecord>,
{
    let mut table = LookupTable::new();
    let mut rendered = 0_usize;

    for (index, record) in records.into_iter().enumerate() {
        let row = index + 1;
        if record.isbn.is_empty() {
            reporter.report(PipelineEvent::RowSkipped {
                row,
                reason: match &record.book_title {
                    Some(title) if !title.is_empty() => format!("empty ISBN for '{title}'"),
                    _ => "empty ISBN".to_string(),
                },
            });
            continue;
        }

        let title = if let Some(headline) = record.usable_headline() {
            headline.to_string()
        } else {
            match fetcher.fetch_title(&record.url).await {
                Ok(title) => title.trim().to_string(),
                Err(error) => {
                    let kept = policy == FetchFailurePolicy::EmitEmpty;
                    reporter.report(PipelineEvent::FetchFailed {
                        url: record.url.clone(),
                        isbn: record.isbn.clone(),
                        error: error.to_string(),
                        kept,
                    });
                    if !kept {
                        continue;
                    }
                    String::new()
                }
            }
        };

        debug!(row, isbn = %record.isbn, station = %record.station_name, "rendered coverage link");
        table.push_link(
            &record.isbn,
            render_link(&record.url, &record.station_name, &title),
        );
        rendered += 1;
    }

    info!(
        links = rendered,
        isbns = table.len(),
        "Built coverage lookup table"
    );
    table
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::report::AuditLog;
    use crate::tabular::{CoverageColumns, read_coverage};

    /// Serves canned titles and records every URL it was asked for.
    #[derive(Default)]
    struct CannedFetcher {
        titles: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        fn with(pairs: &[(&str, &str)]) -> Self {
            Self {
                titles: pairs
                    .iter()
                    .map(|(url, title)| ((*url).to_string(), (*title).to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TitleFetcher for CannedFetcher {
        async fn fetch_title(&self, url: &str) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.titles
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn record(isbn: &str, station: &str, url: &str, headline: Option<&str>) -> CoverageRecord {
        CoverageRecord {
            isbn: isbn.to_string(),
            station_name: station.to_string(),
            url: url.to_string(),
            headline: headline.map(str::to_string),
            book_title: None,
        }
    }

    #[tokio::test]
    async fn test_headline_used_without_fetching() {
        let fetcher = CannedFetcher::default();
        let log = AuditLog::new();
        let table = build_lookup_table(
            vec![record("123", "KQED", "https://kqed.org/a", Some("Great Read"))],
            &fetcher,
            FetchFailurePolicy::Skip,
            &log,
        )
        .await;

        assert_eq!(
            table.get("123").unwrap(),
            ["<a href=\"https://kqed.org/a\">KQED: Great Read</a>".to_string()]
        );
        assert!(fetcher.calls().is_empty(), "headline rows must not fetch");
    }

    #[tokio::test]
    async fn test_missing_or_blank_headline_fetches_title() {
        let fetcher = CannedFetcher::with(&[
            ("https://a.org", "Page A"),
            ("https://b.org", "  Page B \n"),
        ]);
        let log = AuditLog::new();
        let table = build_lookup_table(
            vec![
                record("123", "KQED", "https://a.org", None),
                record("123", "WBUR", "https://b.org", Some("   ")),
            ],
            &fetcher,
            FetchFailurePolicy::Skip,
            &log,
        )
        .await;

        assert_eq!(
            table.get("123").unwrap(),
            [
                "<a href=\"https://a.org\">KQED: Page A</a>".to_string(),
                "<a href=\"https://b.org\">WBUR: Page B</a>".to_string(),
            ]
        );
        assert_eq!(fetcher.calls(), vec!["https://a.org", "https://b.org"]);
    }

    #[tokio::test]
    async fn test_links_grouped_by_raw_isbn_in_input_order() {
        let fetcher = CannedFetcher::default();
        let log = AuditLog::new();
        let table = build_lookup_table(
            vec![
                record("0140449266", "A", "https://a", Some("1")),
                record("140449266", "B", "https://b", Some("2")),
                record("0140449266", "C", "https://c", Some("3")),
            ],
            &fetcher,
            FetchFailurePolicy::Skip,
            &log,
        )
        .await;

        assert_eq!(table.len(), 2, "raw ISBN spellings stay separate keys");
        let links = table.get("0140449266").unwrap();
        assert!(links[0].contains("A: 1"));
        assert!(links[1].contains("C: 3"));
    }

    #[tokio::test]
    async fn test_empty_isbn_rows_skipped_and_reported() {
        let fetcher = CannedFetcher::default();
        let log = AuditLog::new();
        let mut no_isbn = record("", "KQED", "https://a", Some("x"));
        no_isbn.book_title = Some("Orphan Book".to_string());
        let table = build_lookup_table(
            vec![no_isbn, record("1", "WBUR", "https://b", Some("y"))],
            &fetcher,
            FetchFailurePolicy::Skip,
            &log,
        )
        .await;

        assert_eq!(table.len(), 1);
        assert_eq!(
            log.events(),
            vec![PipelineEvent::RowSkipped {
                row: 1,
                reason: "empty ISBN for 'Orphan Book'".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_skip_policy_drops_record() {
        let fetcher = CannedFetcher::with(&[("https://ok.org", "Fine")]);
        let log = AuditLog::new();
        let table = build_lookup_table(
            vec![
                record("9", "KQED", "https://broken.org", None),
                record("9", "WBUR", "https://ok.org", None),
            ],
            &fetcher,
            FetchFailurePolicy::Skip,
            &log,
        )
        .await;

        assert_eq!(
            table.get("9").unwrap(),
            ["<a href=\"https://ok.org\">WBUR: Fine</a>".to_string()]
        );
        let events = log.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            PipelineEvent::FetchFailed { url, kept: false, .. } if url == "https://broken.org"
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_emit_empty_policy_keeps_record() {
        let fetcher = CannedFetcher::default();
        let log = AuditLog::new();
        let table = build_lookup_table(
            vec![record("9", "KQED", "https://broken.org", None)],
            &fetcher,
            FetchFailurePolicy::EmitEmpty,
            &log,
        )
        .await;

        assert_eq!(
            table.get("9").unwrap(),
            ["<a href=\"https://broken.org\">KQED: </a>".to_string()]
        );
        assert_eq!(
            log.count(|e| matches!(e, PipelineEvent::FetchFailed { kept: true, .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_headline_column_disabled_fetches_every_title() {
        let sheet = "ISBN,Station name,URL,Headline\n\
                     123,KQED,https://kqed.org/a,Great Read\n\
                     123,WBUR,https://wbur.org/b,Second Look\n";
        let columns = CoverageColumns {
            headline: None,
            ..CoverageColumns::default()
        };
        let records = read_coverage(sheet.as_bytes(), "coverage", &columns).unwrap();
        assert!(records.iter().all(|r| r.headline.is_none()));

        let fetcher = CannedFetcher::with(&[
            ("https://kqed.org/a", "KQED Forum"),
            ("https://wbur.org/b", "Here and Now"),
        ]);
        let log = AuditLog::new();
        let table = build_lookup_table(records, &fetcher, FetchFailurePolicy::Skip, &log).await;

        assert_eq!(fetcher.calls(), ["https://kqed.org/a", "https://wbur.org/b"]);
        assert_eq!(
            table.get("123").unwrap(),
            [
                "<a href=\"https://kqed.org/a\">KQED: KQED Forum</a>".to_string(),
                "<a href=\"https://wbur.org/b\">WBUR: Here and Now</a>".to_string(),
            ]
        );
    }

    #[test]
    fn test_fetch_failure_policy_parse() {
        assert_eq!("skip".parse::<FetchFailurePolicy>(), Ok(FetchFailurePolicy::Skip));
        assert_eq!(
            " Empty ".parse::<FetchFailurePolicy>(),
            Ok(FetchFailurePolicy::EmitEmpty)
        );
        assert_eq!(
            "emit_empty".parse::<FetchFailurePolicy>(),
            Ok(FetchFailurePolicy::EmitEmpty)
        );
        assert!("abort".parse::<FetchFailurePolicy>().is_err());
        assert_eq!(FetchFailurePolicy::default(), FetchFailurePolicy::Skip);
        assert_eq!(FetchFailurePolicy::EmitEmpty.to_string(), "empty");
    }
}

//! Merge books with coverage links, then audit unused coverage.
//!
//! Every book produces exactly one merged row whether or not coverage was
//! found. Afterwards, any lookup key that no book consumed is reported so an
//! operator can chase typos in the coverage form.

use std::collections::HashSet;

use tracing::{info, instrument};

use crate::isbn::{MatchError, match_isbn};
use crate::lookup::LookupTable;
use crate::report::{PipelineEvent, Reporter};

/// Separator between rendered links in the merged links field.
pub const LINK_SEPARATOR: &str = ",";

/// A row of the books sheet. Other columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookRecord {
    /// Book title.
    pub title: String,
    /// Book ISBN, possibly empty.
    pub isbn: String,
}

/// A row of the merge output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedRecord {
    /// Book title, copied from the input.
    pub title: String,
    /// Book ISBN, copied from the input.
    pub isbn: String,
    /// Comma-joined rendered links, empty when there is no coverage.
    pub external_links_html: String,
}

/// Result of a merge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// One record per input book, in input order.
    pub records: Vec<MergedRecord>,
    /// Lookup keys never consumed by any book, in table order.
    pub unmatched_keys: Vec<String>,
}

impl MergeOutcome {
    /// Number of books that received at least one link.
    #[must_use]
    pub fn matched_books(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.external_links_html.is_empty())
            .count()
    }
}

/// Joins books against the lookup table and audits unused keys.
///
/// Books with an empty ISBN are passed through without a lookup. A book whose
/// ISBN has no coverage is passed through with an empty links field. The key
/// marked as consumed is the table key that matched, which may be a padded
/// or zero-stripped spelling of the book's ISBN.
#[instrument(skip_all, fields(books = books.len(), keys = table.len()))]
pub fn merge_links(books: &[BookRecord], table: &LookupTable, reporter: &dyn Reporter) -> MergeOutcome {
    let mut matched: HashSet<&str> = HashSet::new();
    let mut records = Vec::with_capacity(books.len());

    for book in books {
        let mut merged = MergedRecord {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            external_links_html: String::new(),
        };

        if !book.isbn.is_empty() {
            match match_isbn(&book.isbn, table) {
                Ok(hit) => {
                    merged.external_links_html = hit.links.join(LINK_SEPARATOR);
                    matched.insert(hit.key);
                }
                // No member station coverage. This is OK.
                Err(MatchError::NotFound { isbn }) => {
                    reporter.report(PipelineEvent::BookUnmatched { isbn });
                }
            }
        }

        records.push(merged);
    }

    let unmatched_keys: Vec<String> = table
        .keys()
        .filter(|key| !matched.contains(key))
        .map(str::to_string)
        .collect();
    for key in &unmatched_keys {
        reporter.report(PipelineEvent::UnmatchedKey { isbn: key.clone() });
    }

    let outcome = MergeOutcome {
        records,
        unmatched_keys,
    };
    info!(
        books = outcome.records.len(),
        matched = outcome.matched_books(),
        unmatched_keys = outcome.unmatched_keys.len(),
        "Merged coverage links"
    );
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::AuditLog;

    fn book(title: &str, isbn: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            isbn: isbn.to_string(),
        }
    }

    fn table(entries: &[(&str, &[&str])]) -> LookupTable {
        entries
            .iter()
            .map(|(key, links)| {
                (
                    (*key).to_string(),
                    links.iter().map(|link| (*link).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_single_match() {
        let log = AuditLog::new();
        let outcome = merge_links(
            &[book("X", "123")],
            &table(&[("123", &["<li>A</li>"])]),
            &log,
        );
        assert_eq!(
            outcome.records,
            vec![MergedRecord {
                title: "X".to_string(),
                isbn: "123".to_string(),
                external_links_html: "<li>A</li>".to_string(),
            }]
        );
        assert!(outcome.unmatched_keys.is_empty());
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_links_joined_with_comma_in_order() {
        let log = AuditLog::new();
        let outcome = merge_links(
            &[book("X", "123")],
            &table(&[("123", &["a", "b", "c"])]),
            &log,
        );
        assert_eq!(outcome.records[0].external_links_html, "a,b,c");
    }

    #[test]
    fn test_output_length_equals_input_length() {
        let t = table(&[("1", &["a"]), ("2", &["b"])]);
        let books = vec![
            book("one", "1"),
            book("blank", ""),
            book("missing", "999"),
            book("one again", "1"),
            book("two", "0002"),
        ];
        let log = AuditLog::new();
        let outcome = merge_links(&books, &t, &log);
        assert_eq!(outcome.records.len(), books.len());
        let titles: Vec<&str> = outcome.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "blank", "missing", "one again", "two"]);
        assert_eq!(outcome.records[3].external_links_html, "a", "keys can be reused");
        assert_eq!(outcome.records[4].external_links_html, "b", "stripped candidate");
        assert_eq!(outcome.matched_books(), 3);
    }

    #[test]
    fn test_empty_books_and_empty_table() {
        let log = AuditLog::new();
        let outcome = merge_links(&[], &LookupTable::new(), &log);
        assert_eq!(outcome, MergeOutcome::default());
    }

    #[test]
    fn test_unmatched_keys_reported() {
        let t = table(&[("123", &["a"]), ("555", &["orphan"])]);
        let log = AuditLog::new();
        let outcome = merge_links(&[book("X", "123")], &t, &log);
        assert_eq!(outcome.unmatched_keys, vec!["555".to_string()]);
        assert_eq!(
            log.events(),
            vec![PipelineEvent::UnmatchedKey {
                isbn: "555".to_string()
            }]
        );
    }

    #[test]
    fn test_matched_key_not_input_isbn_is_consumed() {
        // Book ISBN keeps its leading zero; the coverage sheet lost it.
        let t = table(&[("140449266", &["a"])]);
        let log = AuditLog::new();
        let outcome = merge_links(&[book("Odyssey", "0140449266")], &t, &log);
        assert_eq!(outcome.records[0].external_links_html, "a");
        assert!(outcome.unmatched_keys.is_empty());
    }

    #[test]
    fn test_empty_isbn_skips_lookup_and_reports_nothing() {
        let t = table(&[("", &["should-not-attach"])]);
        let log = AuditLog::new();
        let outcome = merge_links(&[book("No ISBN", "")], &t, &log);
        assert_eq!(outcome.records[0].external_links_html, "");
        assert_eq!(outcome.unmatched_keys, vec![String::new()]);
        assert_eq!(
            log.count(|e| matches!(e, PipelineEvent::BookUnmatched { .. })),
            0
        );
    }

    #[test]
    fn test_not_found_reported_as_book_unmatched() {
        let log = AuditLog::new();
        let outcome = merge_links(&[book("Y", "42")], &LookupTable::new(), &log);
        assert_eq!(outcome.records[0].external_links_html, "");
        assert_eq!(
            log.events(),
            vec![PipelineEvent::BookUnmatched {
                isbn: "42".to_string()
            }]
        );
    }
}

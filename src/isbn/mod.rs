//! ISBN candidate expansion and lookup-table matching.
//!
//! ISBNs arrive from two spreadsheets with inconsistent zero handling: one
//! side may have had its leading zeros eaten by spreadsheet auto-formatting,
//! the other may carry a 9-digit legacy number. Rather than normalizing keys
//! when the lookup table is built, the table keeps the raw ISBN and every
//! lookup tries a short, ordered list of candidate spellings.
//!
//! # Example
//!
//! ```
//! use station_links_core::isbn::{candidates, match_isbn};
//! use station_links_core::LookupTable;
//!
//! let mut table = LookupTable::new();
//! table.push_link("140449266", "<a href=\"https://example.org\">KQED: Review</a>".to_string());
//!
//! assert_eq!(candidates("0140449266"), vec!["0140449266", "140449266"]);
//! let hit = match_isbn("0140449266", &table).unwrap();
//! assert_eq!(hit.key, "140449266");
//! ```

mod error;

pub use error::MatchError;

use tracing::trace;

use crate::lookup::LookupTable;

/// Minimum ISBN length that the padded candidate is extended to.
pub const PADDED_ISBN_LEN: usize = 10;

/// A successful lookup: the links stored under `key`.
///
/// `key` is the table key that matched, which may differ from the ISBN that
/// was looked up. The merge audit marks this key as consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsbnMatch<'a> {
    /// Lookup table key that produced the hit.
    pub key: &'a str,
    /// Rendered links stored under the key, in insertion order.
    pub links: &'a [String],
}

/// Returns the lookup candidates for an ISBN in priority order.
///
/// 1. The ISBN as given.
/// 2. Right-padded with `'0'` to at least 10 characters, if that changes it.
/// 3. Leading `'0'` characters stripped, if that changes it.
#[must_use]
pub fn candidates(isbn: &str) -> Vec<String> {
    let mut out = vec![isbn.to_string()];

    let mut padded = isbn.to_string();
    let missing = PADDED_ISBN_LEN.saturating_sub(isbn.chars().count());
    padded.extend(std::iter::repeat_n('0', missing));
    if padded != isbn {
        out.push(padded);
    }

    let stripped = isbn.trim_start_matches('0');
    if stripped != isbn {
        out.push(stripped.to_string());
    }

    out
}

/// Looks up an ISBN in the table, trying each candidate in order.
///
/// An empty ISBN never matches, whatever the table contains.
///
/// # Errors
///
/// Returns [`MatchError::NotFound`] when no candidate is a table key. Callers
/// treat this as "no coverage for this book", not as a failure.
pub fn match_isbn<'a>(isbn: &str, table: &'a LookupTable) -> Result<IsbnMatch<'a>, MatchError> {
    if isbn.is_empty() {
        return Err(MatchError::not_found(isbn));
    }

    for candidate in candidates(isbn) {
        if let Some((key, links)) = table.get_key_value(&candidate) {
            trace!(isbn, key, "ISBN candidate matched");
            return Ok(IsbnMatch { key, links });
        }
        trace!(isbn, candidate = %candidate, "ISBN candidate missed");
    }

    Err(MatchError::not_found(isbn))
}

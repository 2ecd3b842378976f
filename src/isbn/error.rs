//! Error type for ISBN lookups.

use thiserror::Error;

/// Outcome of a lookup that found nothing.
///
/// This is an expected result during a merge, kept distinct from an empty
/// link list so callers cannot confuse "no coverage" with "coverage with no
/// links".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No candidate spelling of the ISBN is a lookup table key.
    #[error("ISBN '{isbn}' not found in lookup table")]
    NotFound {
        /// The ISBN that was looked up.
        isbn: String,
    },
}

impl MatchError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(isbn: &str) -> Self {
        Self::NotFound {
            isbn: isbn.to_string(),
        }
    }

    /// The ISBN that failed to match.
    #[must_use]
    pub fn isbn(&self) -> &str {
        match self {
            Self::NotFound { isbn } => isbn,
        }
    }
}

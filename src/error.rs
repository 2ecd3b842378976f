//! Fatal pipeline errors.
//!
//! Anything in this enum stops the run. Expected per-record outcomes (an ISBN
//! with no coverage, a station page that would not load) are absorbed by the
//! stage that meets them and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that halt a pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required column is missing from an input file.
    #[error(
        "missing required column '{column}' in {source_name} (found: {found})\n  Suggestion: {suggestion}"
    )]
    Schema {
        /// Input the column was expected in.
        source_name: String,
        /// Required column that was not found.
        column: String,
        /// Header names that were present, comma-separated.
        found: String,
        /// How to fix the issue.
        suggestion: String,
    },

    /// The spreadsheet export did not return CSV.
    #[error(
        "unexpected Content-Type '{content_type}' from {url}\n  Suggestion: publish the first worksheet to the web as CSV"
    )]
    ExportFormat {
        /// Export URL that was requested.
        url: String,
        /// Content type the server declared.
        content_type: String,
    },

    /// HTTP request failed (network error or non-success status).
    #[error("HTTP request to {url} failed: {reason}")]
    Http {
        /// Requested URL.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// File system error reading or writing a pipeline file.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File the error occurred on.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited input or failed CSV write.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File (or stream label) being read or written.
        path: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Malformed lookup table JSON.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// File (or stream label) being read or written.
        path: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// Creates a schema error for a missing column.
    #[must_use]
    pub fn missing_column(source_name: &str, column: &str, found: &[String]) -> Self {
        Self::Schema {
            source_name: source_name.to_string(),
            column: column.to_string(),
            found: found.join(", "),
            suggestion: format!(
                "add a '{column}' column or point the column mapping at an existing header"
            ),
        }
    }

    /// Creates an export format error for a non-CSV response.
    pub fn export_format(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::ExportFormat {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an HTTP error.
    pub fn http(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a CSV error.
    pub fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Creates a JSON error.
    pub fn json(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

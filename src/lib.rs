//! Station Links Core Library
//!
//! Reconciles member-station coverage of books with the books spreadsheet.
//! Coverage links arrive through a form keyed by ISBN; this library turns
//! them into an ISBN lookup table and joins that table against the books
//! export, producing a CSV that can be pasted back into the spreadsheet.
//!
//! # Architecture
//!
//! The pipeline runs in three independent stages:
//! - [`coverage`] - Coverage rows → [`LookupTable`] of rendered links
//! - [`isbn`] - ISBN candidate expansion and table matching
//! - [`merge`] - Books + lookup table → merged rows and an unmatched-key audit
//!
//! Supporting modules:
//! - [`tabular`] - CSV readers and writer with column mapping
//! - [`sheet`] - Published spreadsheet export download
//! - [`report`] - Event reporting for data-quality audits

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coverage;
pub mod error;
pub mod http_client;
pub mod isbn;
pub mod lookup;
pub mod merge;
pub mod report;
pub mod sheet;
pub mod tabular;
mod user_agent;

// Re-export commonly used types
pub use coverage::{
    CoverageRecord, FetchError, FetchFailurePolicy, HttpTitleFetcher, TitleFetcher,
    build_lookup_table,
};
pub use error::PipelineError;
pub use http_client::{HttpSettings, build_http_client};
pub use isbn::{IsbnMatch, MatchError, candidates, match_isbn};
pub use lookup::LookupTable;
pub use merge::{BookRecord, MergeOutcome, MergedRecord, merge_links};
pub use report::{AuditLog, PipelineEvent, Reporter, TracingReporter};
pub use tabular::CoverageColumns;

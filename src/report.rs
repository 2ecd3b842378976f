//! Pipeline event reporting.
//!
//! Stages do not log directly for data-quality events; they call a
//! [`Reporter`] handed in by the driver. [`TracingReporter`] forwards to
//! `tracing`, [`AuditLog`] keeps events in memory for summaries and tests.

use std::sync::Mutex;

use tracing::{debug, warn};

/// Data-quality events raised while building or merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A coverage row was dropped before rendering.
    RowSkipped {
        /// 1-based data row number.
        row: usize,
        /// Why it was dropped.
        reason: String,
    },
    /// A station page title could not be fetched.
    FetchFailed {
        /// Page URL.
        url: String,
        /// ISBN of the coverage record.
        isbn: String,
        /// Error description.
        error: String,
        /// Whether the record was kept with an empty title.
        kept: bool,
    },
    /// A book had no coverage in the lookup table.
    BookUnmatched {
        /// Book ISBN that was looked up.
        isbn: String,
    },
    /// A lookup key was never consumed by any book.
    UnmatchedKey {
        /// Lookup table key.
        isbn: String,
    },
}

/// Receiver for pipeline events.
pub trait Reporter {
    /// Handles one event.
    fn report(&self, event: PipelineEvent);
}

/// Reporter that emits each event as a `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::RowSkipped { row, reason } => {
                debug!(row, reason = %reason, "Skipped coverage row");
            }
            PipelineEvent::FetchFailed {
                url,
                isbn,
                error,
                kept,
            } => {
                warn!(url = %url, isbn = %isbn, error = %error, kept, "Could not fetch link title");
            }
            PipelineEvent::BookUnmatched { isbn } => {
                debug!(isbn = %isbn, "No member station coverage for book");
            }
            PipelineEvent::UnmatchedKey { isbn } => {
                warn!(isbn = %isbn, "No matching book found for ISBN");
            }
        }
    }
}

/// Reporter that records events, optionally forwarding them.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Mutex<Vec<PipelineEvent>>,
    forward: Option<TracingReporter>,
}

impl AuditLog {
    /// Creates a log that only records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log that records and also emits through `tracing`.
    #[must_use]
    pub fn with_tracing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            forward: Some(TracingReporter),
        }
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Counts recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events
            .lock()
            .map(|events| events.iter().filter(|event| predicate(event)).count())
            .unwrap_or_default()
    }
}

impl Reporter for AuditLog {
    fn report(&self, event: PipelineEvent) {
        if let Some(forward) = self.forward {
            forward.report(event.clone());
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

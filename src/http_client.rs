//! Shared HTTP client construction.
//!
//! Title fetches and the sheet export go through one client so both get the
//! same timeouts and User-Agent. The total timeout keeps a stalled station
//! server from hanging the whole run.

use std::time::Duration;

use reqwest::Client;

use crate::error::PipelineError;
use crate::user_agent;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total request timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Timeout settings for pipeline HTTP requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// TCP/TLS connect timeout.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, including reading the body.
    pub read_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Builds the pipeline HTTP client.
///
/// # Errors
///
/// Returns [`PipelineError::Http`] when the client cannot be constructed
/// (for example, no TLS backend is available).
pub fn build_http_client(settings: HttpSettings) -> Result<Client, PipelineError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.read_timeout_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| {
            PipelineError::http("<client>", format!("HTTP client construction failed: {error}"))
        })
}

//! Shared User-Agent string for title fetches and sheet exports.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/nprapps/books";

/// Default User-Agent for every request the pipeline makes.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("station-links/{version} (+{PROJECT_UA_URL})")
}

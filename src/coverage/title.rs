//! Fetching station page titles.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::error::PipelineError;
use crate::http_client::{HttpSettings, build_http_client};

#[allow(clippy::expect_used)]
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid")); // Static selector, safe to panic

/// Why a single title fetch failed. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// URL could not be parsed or is not http(s).
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parse failure description.
        reason: String,
    },

    /// Connection, TLS, timeout, or body read failure.
    #[error("network error fetching {url}: {reason}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        reason: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
    },
}

/// Source of document titles for coverage links without a headline.
#[async_trait]
pub trait TitleFetcher {
    /// Returns the `<title>` text of the page at `url`.
    async fn fetch_title(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches titles over HTTP with a single best-effort GET.
#[derive(Debug, Clone)]
pub struct HttpTitleFetcher {
    client: Client,
}

impl HttpTitleFetcher {
    /// Creates a fetcher using the given timeout settings.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: HttpSettings) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_http_client(settings)?,
        })
    }

    /// Creates a fetcher around an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TitleFetcher for HttpTitleFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_title(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|error| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: error.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("scheme '{}' is not supported", parsed.scheme()),
            });
        }

        let network = |error: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            reason: error.to_string(),
        };

        let response = self.client.get(parsed).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        let title = extract_title(&body);
        debug!(title = %title, "fetched link title");
        Ok(title)
    }
}

/// Returns the text of the first `<title>` element in `html`.
///
/// Markup nested inside the title is ignored and only its text kept.
/// Documents without a title yield an empty string.
#[must_use]
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let Some(element) = document.select(&TITLE_SELECTOR).next() else {
        return String::new();
    };

    // <title> is raw text to the HTML parser, so nested tags arrive as literal
    // text. A second fragment parse turns them back into elements.
    let raw = element.text().collect::<String>();
    if !raw.contains('<') {
        return raw;
    }
    Html::parse_fragment(&raw)
        .root_element()
        .text()
        .collect::<String>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_simple() {
        let html = "<html><head><title>Station Review</title></head><body></body></html>";
        assert_eq!(extract_title(html), "Station Review");
    }

    #[test]
    fn test_extract_title_uppercase_tag() {
        let html = "<HTML><HEAD><TITLE>Loud Title</TITLE></HEAD></HTML>";
        assert_eq!(extract_title(html), "Loud Title");
    }

    #[test]
    fn test_extract_title_missing_is_empty() {
        assert_eq!(extract_title("<html><body><p>No title</p></body></html>"), "");
        assert_eq!(extract_title(""), "");
    }

    #[test]
    fn test_extract_title_first_only() {
        let html = "<html><head><title>First</title></head><body><svg><title>Icon</title></svg></body></html>";
        assert_eq!(extract_title(html), "First");
    }

    #[test]
    fn test_extract_title_drops_nested_markup() {
        assert_eq!(extract_title("<title>A <b>B</b> C</title>"), "A B C");
        assert_eq!(
            extract_title("<html><head><title>Review: <i>The</i> Odyssey</title></head></html>"),
            "Review: The Odyssey"
        );
    }

    #[test]
    fn test_extract_title_decodes_entities() {
        let html = "<title>Books &amp; Authors</title>";
        assert_eq!(extract_title(html), "Books & Authors");
    }

    #[tokio::test]
    async fn test_fetch_title_rejects_relative_url() {
        let fetcher = HttpTitleFetcher::new(HttpSettings::default()).unwrap();
        let err = fetcher.fetch_title("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_fetch_title_rejects_non_web_scheme() {
        let fetcher = HttpTitleFetcher::new(HttpSettings::default()).unwrap();
        let err = fetcher.fetch_title("ftp://example.com/page").await.unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}

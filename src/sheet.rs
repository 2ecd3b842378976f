//! Downloading the published coverage spreadsheet as CSV.
//!
//! The coverage form writes to a spreadsheet whose first worksheet must be
//! published to the web as CSV. When it is not, the export URL still answers
//! 200 but with an HTML page, so the declared content type is checked before
//! the bytes are trusted.

use std::path::Path;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, instrument};

use crate::error::PipelineError;

/// Base URL for published spreadsheet exports.
pub const PUBLISHED_SHEET_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/e";

/// Media type the export must declare.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// Builds the CSV export URL for a published spreadsheet key.
#[must_use]
pub fn export_url(sheet_key: &str) -> String {
    format!(
        "{PUBLISHED_SHEET_BASE_URL}/{}/pub?output=csv",
        sheet_key.trim()
    )
}

/// Whether a Content-Type header value names CSV, ignoring parameters.
#[must_use]
pub fn is_csv_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(CSV_MEDIA_TYPE))
}

/// Fetches the export and returns its bytes.
///
/// # Errors
///
/// - [`PipelineError::Http`] on network failure or non-success status
/// - [`PipelineError::ExportFormat`] when the response is not declared as CSV
#[instrument(skip(client))]
pub async fn fetch_sheet_csv(client: &Client, url: &str) -> Result<Vec<u8>, PipelineError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| PipelineError::http(url, error.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::http(url, format!("HTTP {}", status.as_u16())));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !is_csv_content_type(&content_type) {
        return Err(PipelineError::export_format(url, content_type));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|error| PipelineError::http(url, error.to_string()))?;
    Ok(bytes.to_vec())
}

/// Fetches the export and writes it to `output_path`.
///
/// Nothing is written unless the export passes the content type check.
///
/// # Errors
///
/// See [`fetch_sheet_csv`]; also [`PipelineError::Io`] if the file cannot be written.
pub async fn download_sheet(
    client: &Client,
    url: &str,
    output_path: &Path,
) -> Result<usize, PipelineError> {
    let bytes = fetch_sheet_csv(client, url).await?;
    tokio::fs::write(output_path, &bytes)
        .await
        .map_err(|source| PipelineError::io(output_path, source))?;
    info!(path = %output_path.display(), bytes = bytes.len(), "Saved coverage sheet");
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_url_format() {
        assert_eq!(
            export_url(" 2PACX-abc "),
            "https://docs.google.com/spreadsheets/d/e/2PACX-abc/pub?output=csv"
        );
    }

    #[test]
    fn test_is_csv_content_type() {
        assert!(is_csv_content_type("text/csv"));
        assert!(is_csv_content_type("text/csv; charset=utf-8"));
        assert!(is_csv_content_type("Text/CSV"));
        assert!(!is_csv_content_type("text/html; charset=utf-8"));
        assert!(!is_csv_content_type("text/csvx"));
        assert!(!is_csv_content_type(""));
    }
}

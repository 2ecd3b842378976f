//! Integration tests for the published spreadsheet export.

use station_links_core::sheet::{download_sheet, fetch_sheet_csv};
use station_links_core::{HttpSettings, PipelineError, build_http_client};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const SHEET_CSV: &str = "ISBN,Station name,URL,Headline\n123,KQED,https://kqed.org/a,Great\n";

#[tokio::test]
async fn test_fetch_sheet_accepts_csv_with_charset() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/abc/pub"))
        .and(query_param("output", "csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(SHEET_CSV, "text/csv; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = build_http_client(HttpSettings::default()).unwrap();
    let url = format!("{}/abc/pub?output=csv", server.uri());
    let bytes = fetch_sheet_csv(&client, &url).await.unwrap();
    assert_eq!(bytes, SHEET_CSV.as_bytes());
}

#[tokio::test]
async fn test_fetch_sheet_rejects_html_as_export_format_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/unpublished/pub"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><title>Sign in</title></html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = build_http_client(HttpSettings::default()).unwrap();
    let url = format!("{}/unpublished/pub", server.uri());
    let err = fetch_sheet_csv(&client, &url).await.unwrap_err();
    match err {
        PipelineError::ExportFormat { content_type, .. } => {
            assert!(content_type.starts_with("text/html"));
        }
        other => panic!("expected export format error, got {other}"),
    }
}

#[tokio::test]
async fn test_fetch_sheet_non_success_status_is_http_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = build_http_client(HttpSettings::default()).unwrap();
    let err = fetch_sheet_csv(&client, &format!("{}/missing/pub", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Http { .. }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_download_sheet_writes_file_only_on_success() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/good/pub"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(SHEET_CSV, "text/csv"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad/pub"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let client = build_http_client(HttpSettings::default()).unwrap();

    let good_path = temp.path().join("good.csv");
    let written = download_sheet(&client, &format!("{}/good/pub", server.uri()), &good_path)
        .await
        .unwrap();
    assert_eq!(written, SHEET_CSV.len());
    assert_eq!(std::fs::read_to_string(&good_path).unwrap(), SHEET_CSV);

    let bad_path = temp.path().join("bad.csv");
    let result = download_sheet(&client, &format!("{}/bad/pub", server.uri()), &bad_path).await;
    assert!(result.is_err());
    assert!(!bad_path.exists(), "nothing should be written for a non-CSV export");
}

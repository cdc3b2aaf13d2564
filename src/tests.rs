//! HTTP endpoint tests using axum-test

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::{router, AppState};
use crate::export::{Exporter, PDF_WARNING};
use crate::fetch::FetchConfig;
use crate::render::{PdfRenderer, RenderError};

struct StubRenderer {
    succeed: bool,
}

#[async_trait]
impl PdfRenderer for StubRenderer {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn render(&self, _url: &str) -> Result<Vec<u8>, RenderError> {
        if self.succeed {
            Ok(b"%PDF-1.7 stub".to_vec())
        } else {
            Err(RenderError::Failed {
                status: "exit status: 1".into(),
                stderr: "blocked".into(),
            })
        }
    }
}

fn create_test_server(pdf_succeeds: bool) -> TestServer {
    let exporter = Exporter::new(
        FetchConfig::default(),
        Arc::new(StubRenderer {
            succeed: pdf_succeeds,
        }),
    );
    let state = AppState {
        exporter: Arc::new(exporter),
    };
    TestServer::new(router(state)).unwrap()
}

async fn page_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Title</h1><p>Hello</p><ul><li>A</li><li>B</li></ul></body></html>",
            "text/html",
        ))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_health_returns_200() {
    let server = create_test_server(true);
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_index_page_has_form() {
    let server = create_test_server(true);
    let response = server.get("/").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("Webpage to PDF &amp; Word Extractor"));
    assert!(body.contains("Extract and Download"));
    assert!(body.contains("/api/export"));
}

#[tokio::test]
async fn test_export_returns_both_artifacts() {
    let pages = page_server().await;
    let server = create_test_server(true);
    let url = format!("{}/page", pages.uri());

    let response = server.post("/api/export").json(&json!({ "url": url })).await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["message"], "Extraction complete! Download your files below.");
    assert_eq!(body["source_url"], url);
    assert!(body["warning"].is_null());

    let document = &body["document"];
    assert_eq!(document["file_name"], "webpage_content.docx");
    assert_eq!(document["label"], "Download Word Document");
    let docx = STANDARD.decode(document["data"].as_str().unwrap()).unwrap();
    assert_eq!(document["size"].as_u64().unwrap() as usize, docx.len());
    assert!(docx.starts_with(b"PK"));

    let pdf = &body["pdf"];
    assert_eq!(pdf["file_name"], "webpage_content.pdf");
    assert_eq!(pdf["content_type"], "application/pdf");
    assert_eq!(
        STANDARD.decode(pdf["data"].as_str().unwrap()).unwrap(),
        b"%PDF-1.7 stub"
    );
}

#[tokio::test]
async fn test_export_without_pdf_warns() {
    let pages = page_server().await;
    let server = create_test_server(false);

    let response = server
        .post("/api/export")
        .json(&json!({ "url": format!("{}/page", pages.uri()) }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert!(body["pdf"].is_null());
    assert_eq!(body["warning"], PDF_WARNING);
    assert_eq!(body["document"]["file_name"], "webpage_content.docx");
}

#[tokio::test]
async fn test_export_rejects_missing_url() {
    let server = create_test_server(true);

    let response = server.post("/api/export").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<Value>();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["detail"], "Please enter a valid URL (including https://)");
}

#[tokio::test]
async fn test_export_rejects_schemeless_url() {
    let server = create_test_server(true);

    let response = server
        .post("/api/export")
        .json(&json!({ "url": "www.example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_export_upstream_404() {
    let pages = page_server().await;
    let server = create_test_server(true);

    let response = server
        .post("/api/export")
        .json(&json!({ "url": format!("{}/missing", pages.uri()) }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body = response.json::<Value>();
    assert_eq!(body["code"], "NETWORK_ERROR");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Network or access error:"));
    assert!(body.get("document").is_none());
}

#[tokio::test]
async fn test_bind_accepts_host_names() {
    let listener = crate::bind("localhost", 0).await.unwrap();
    assert!(listener.local_addr().unwrap().ip().is_loopback());

    let listener = crate::bind("127.0.0.1", 0).await.unwrap();
    assert_ne!(listener.local_addr().unwrap().port(), 0);
}

#[tokio::test]
async fn test_export_non_json_body_gets_json_error() {
    let server = create_test_server(true);

    let response = server.post("/api/export").text("url=https://example.com").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<Value>();
    assert_eq!(body["code"], "UNEXPECTED_ERROR");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Unexpected error:"));
}

#[tokio::test]
async fn test_export_malformed_json_gets_json_error() {
    let server = create_test_server(true);

    let response = server
        .post("/api/export")
        .content_type("application/json")
        .bytes("{\"url\": ".into())
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "UNEXPECTED_ERROR");
}

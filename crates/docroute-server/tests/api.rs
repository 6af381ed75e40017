//! HTTP endpoint tests driven through the router without binding a socket.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use docroute_config::{DocrouteConfig, ServerConfig};
use docroute_core::DocumentRouter;
use docroute_memory::InMemoryContextStore;
use docroute_server::{AppState, IntakeError, PdfTextConverter, build_router};
use docroute_test_utils::fixtures::{INVOICE_JSON, INVOICE_PDF_TEXT, PDF_MAGIC, RFQ_EMAIL};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "docroute-test-boundary";

struct FixedConverter;

impl PdfTextConverter for FixedConverter {
    fn convert(&self, _bytes: &[u8]) -> Result<String, IntakeError> {
        Ok(INVOICE_PDF_TEXT.to_string())
    }
}

fn app_with(config: ServerConfig) -> Router {
    let router = DocumentRouter::from_config(
        &DocrouteConfig::default(),
        Arc::new(InMemoryContextStore::new()),
    )
    .expect("router");
    let state = AppState::with_converter(router, Arc::new(FixedConverter));
    build_router(state, &config)
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(content_type) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri("/process/file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn process_returns_classification_and_result() {
    let (status, body) = send(
        &app(),
        json_request("/process", json!({ "content": INVOICE_JSON })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["format"], "structured-data");
    assert_eq!(body["classification"]["intent"], "invoice");
    assert_eq!(body["processing_result"]["handler"], "structured_data");
    assert_eq!(
        body["processing_result"]["fields"]["invoice_number"],
        "INV-001"
    );
    assert_eq!(body["processing_result"]["validation_errors"], json!([]));
}

#[tokio::test]
async fn empty_content_is_a_bad_request() {
    let (status, body) = send(&app(), json_request("/process", json!({ "content": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn records_are_listed_by_thread_and_fetched_by_id() {
    let app = app();
    let mut ids = Vec::new();
    for content in [RFQ_EMAIL, INVOICE_JSON] {
        let (status, body) = send(
            &app,
            json_request(
                "/process",
                json!({ "content": content, "metadata": { "thread_id": "thread-9", "source": "paste" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["thread_id"], "thread-9");
        ids.push(body["record_id"].clone());
    }

    let (status, body) = send(&app, get("/threads/thread-9/records")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Value> = body["records"]
        .as_array()
        .expect("records")
        .iter()
        .map(|record| record["id"].clone())
        .collect();
    assert_eq!(listed, ids);

    let id = ids[0].as_str().expect("id");
    let (status, body) = send(&app, get(&format!("/records/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "email");
    assert_eq!(body["intent"], "rfq");
}

#[tokio::test]
async fn unknown_records_are_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        get("/records/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, get("/records/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pdf_upload_is_routed_as_pdf_text() {
    let request = multipart_request(&[
        ("file", Some("application/pdf"), PDF_MAGIC),
        ("thread_id", None, b"uploads".as_slice()),
    ]);
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["format"], "pdf-text");
    assert_eq!(body["processing_result"]["handler"], "pdf_text");
    assert_eq!(body["thread_id"], "uploads");
}

#[tokio::test]
async fn text_upload_is_routed_by_content() {
    let request = multipart_request(&[("file", Some("text/plain"), RFQ_EMAIL.as_bytes())]);
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["format"], "email");
    assert_eq!(body["processing_result"]["fields"]["sender"], "sender@example.com");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let request = multipart_request(&[("thread_id", None, b"t".as_slice())]);
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "missing `file` field");
}

#[tokio::test]
async fn binary_upload_is_rejected() {
    let png: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    let request = multipart_request(&[("file", Some("image/png"), png)]);
    let (status, _) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_uploads_are_refused() {
    let app = app_with(ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    });
    let big = vec![b'a'; 4096];
    let request = multipart_request(&[("file", Some("text/plain"), big.as_slice())]);
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

//! Router-level tests for the analyze and health endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pace_analysis::Analyzer;
use pace_api::{create_router, ApiConfig, AppState};
use pace_gemini::{GeminiClient, GeminiConfig, PollConfig};
use pace_models::SECTION_HEADINGS;

const BOUNDARY: &str = "pace-test-boundary";

fn test_config(temp_dir: &std::path::Path) -> ApiConfig {
    ApiConfig {
        temp_dir: temp_dir.to_path_buf(),
        public_dir: temp_dir.join("no-public-dir"),
        ..ApiConfig::default()
    }
}

fn app_without_provider(config: ApiConfig) -> axum::Router {
    create_router(AppState::with_analyzer(config, None))
}

fn app_with_provider(config: ApiConfig, base_url: String) -> axum::Router {
    let client = GeminiClient::new(
        "test-key",
        GeminiConfig {
            base_url,
            ..GeminiConfig::default()
        },
    )
    .unwrap();
    let analyzer = Analyzer::new(
        Arc::new(client),
        PollConfig {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(2),
        },
    );
    create_router(AppState::with_analyzer(config, Some(Arc::new(analyzer))))
}

fn video_part(data: &[u8], content_type: &str) -> Vec<u8> {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"clip.mp4\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    part.extend_from_slice(data);
    part.extend_from_slice(b"\r\n");
    part
}

fn text_part(name: &str, value: &str) -> Vec<u8> {
    format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
        .into_bytes()
}

fn form_body(parts: Vec<Vec<u8>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("X-Forwarded-For", "203.0.113.50")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn temp_dir_entry_count(dir: &std::path::Path) -> usize {
    let mut count = 0;
    let mut entries = tokio::fs::read_dir(dir).await.unwrap();
    while let Ok(Some(_)) = entries.next_entry().await {
        count += 1;
    }
    count
}

#[tokio::test]
async fn test_health_reports_ok_and_uptime() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["ok"], serde_json::json!(true));
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn test_missing_confirmation_rejected_without_provider_calls() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let app = app_with_provider(test_config(dir.path()), server.uri());

    let body = form_body(vec![video_part(b"fake video bytes", "video/mp4")]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        "Please confirm the uploaded clip is side-on for reliable analysis."
    );

    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(temp_dir_entry_count(dir.path()).await, 0);
}

#[tokio::test]
async fn test_unconfirmed_value_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let body = form_body(vec![
        video_part(b"fake video bytes", "video/mp4"),
        text_part("sideOnConfirmed", "false"),
    ]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let body = form_body(vec![text_part("sideOnConfirmed", "true")]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Please upload a video file.");
}

#[tokio::test]
async fn test_unsupported_mime_type_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let body = form_body(vec![
        video_part(b"plain text masquerading", "text/plain"),
        text_part("sideOnConfirmed", "true"),
    ]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported file type \"text/plain\""));
    assert_eq!(temp_dir_entry_count(dir.path()).await, 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected_before_core() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let config = ApiConfig {
        max_upload_bytes: 1024,
        ..test_config(dir.path())
    };
    let app = app_with_provider(config, server.uri());

    let body = form_body(vec![
        video_part(&vec![0u8; 4096], "video/mp4"),
        text_part("sideOnConfirmed", "true"),
    ]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(temp_dir_entry_count(dir.path()).await, 0);
}

#[tokio::test]
async fn test_missing_credential_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let body = form_body(vec![
        video_part(b"fake video bytes", "video/mp4"),
        text_part("sideOnConfirmed", "true"),
    ]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        "Server Gemini API key is not configured. Contact the administrator."
    );
    assert_eq!(temp_dir_entry_count(dir.path()).await, 0);
}

#[tokio::test]
async fn test_happy_path_returns_structured_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/v1beta/files"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Goog-Upload-URL", format!("{}/session", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "file": {
                "name": "files/clip1",
                "uri": "https://files/clip1",
                "mimeType": "video/mp4",
                "state": "PROCESSING"
            }
        })))
        .mount(&server)
        .await;
    // Two PROCESSING polls, then ACTIVE.
    Mock::given(method("GET"))
        .and(path("/v1beta/files/clip1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/clip1",
            "uri": "https://files/clip1",
            "mimeType": "video/mp4",
            "state": "PROCESSING"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/clip1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "files/clip1",
            "uri": "https://files/clip1",
            "mimeType": "video/mp4",
            "state": "ACTIVE"
        })))
        .mount(&server)
        .await;

    let structured = SECTION_HEADINGS.join("\n   - observation\n");
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": structured.clone()}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1beta/files/clip1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with_provider(test_config(dir.path()), server.uri());
    let body = form_body(vec![
        video_part(b"fake video bytes", "video/mp4"),
        text_part("sideOnConfirmed", "true"),
    ]);
    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["analysis"], structured);

    // Local temp file removed at request end.
    assert_eq!(temp_dir_entry_count(dir.path()).await, 0);
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        rate_limit_per_minute: 1,
        ..test_config(dir.path())
    };
    let app = app_without_provider(config);

    let body = form_body(vec![text_part("sideOnConfirmed", "true")]);
    let first = app
        .clone()
        .oneshot(analyze_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app.oneshot(analyze_request(body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        second.headers().get("X-RateLimit-Limit").unwrap(),
        "1"
    );
    let body = json_body(second).await;
    assert_eq!(body["error"], "Too many requests. Please wait before trying again.");
}

#[tokio::test]
async fn test_unknown_path_returns_json_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_without_provider(test_config(dir.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/definitely-not-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Not found.");
}

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use core_lib::{create_app, create_app_with_config, AppConfig, AppState, MemoryStorage};
use tower::util::ServiceExt;

const BOUNDARY: &str = "gateway-test-boundary";

fn test_app() -> Router {
    let storage = Arc::new(MemoryStorage::new(vec!["png".to_string()]));
    let state = AppState::new(storage).with_backend_kind("memory");
    create_app(state)
}

fn multipart_request(field_name: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_is_empty_initially() {
    let app = test_app();

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["files"], serde_json::json!([]));
}

#[tokio::test]
async fn test_upload_serve_delete_flow() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request("file", "a.txt", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["message"].as_str().unwrap().contains("a.txt"));

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["files"], serde_json::json!(["a.txt"]));

    let response = app
        .clone()
        .oneshot(get_request("/files/a.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"a.txt\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello");

    let response = app
        .clone()
        .oneshot(delete_request("/files/a.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let response = app.oneshot(get_request("/files/a.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serve_unknown_file_is_404() {
    let app = test_app();

    let response = app.oneshot(get_request("/files/missing.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_upload_replaces_previous_content() {
    let app = test_app();

    app.clone()
        .oneshot(multipart_request("file", "note.txt", b"first"))
        .await
        .unwrap();
    app.clone()
        .oneshot(multipart_request("file", "note.txt", b"second"))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/files/note.txt")).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"second");
}

#[tokio::test]
async fn test_delete_unknown_file_reports_failure_flag() {
    let app = test_app();

    let response = app.oneshot(delete_request("/files/nope.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to delete nope.txt.");
}

#[tokio::test]
async fn test_upload_without_file_field_is_bad_request() {
    let app = test_app();

    let response = app
        .oneshot(multipart_request("attachment", "a.txt", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inline_disposition_for_configured_extension() {
    let app = test_app();

    app.clone()
        .oneshot(multipart_request("file", "pic.png", b"\x89PNG data"))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/files/pic.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"pic.png\""
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
}

#[tokio::test]
async fn test_upload_over_size_limit_reports_failure_flag() {
    let storage = Arc::new(MemoryStorage::default());
    let state = AppState::new(storage).with_backend_kind("memory");

    let mut config = AppConfig::default();
    config.storage.max_file_size_mb = 1;
    let app = create_app_with_config(state, config);

    let oversized = vec![0u8; 2 * 1024 * 1024];
    let response = app
        .clone()
        .oneshot(multipart_request("file", "big.bin", &oversized))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to upload big.bin");

    let response = app.oneshot(get_request("/files/big.bin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_uploads_of_distinct_names() {
    let app = test_app();

    let uploads = (0..5).map(|i| {
        let app = app.clone();
        async move {
            let name = format!("file{}.txt", i);
            let content = format!("content {}", i);
            app.oneshot(multipart_request("file", &name, content.as_bytes()))
                .await
                .unwrap()
        }
    });

    let responses = futures_util::future::join_all(uploads).await;
    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
    }

    let response = app.oneshot(get_request("/")).await.unwrap();
    let json = body_json(response).await;
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["backend"], "memory");
}

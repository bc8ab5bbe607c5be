//! E2E tests for image upload

mod common;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use common::{BackendMode, TEST_BUCKET, TestServer};

fn key_from_url(url: &str) -> &str {
    url.strip_prefix("https://mybucket.s3.amazonaws.com/")
        .expect("virtual-hosted-style URL for the test bucket")
}

#[tokio::test]
async fn test_upload_stores_png_object() {
    let server = TestServer::new().await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let url = body["url"].as_str().unwrap();
    let key = key_from_url(url);
    let id = key.strip_suffix(".png").unwrap();
    assert_eq!(id.len(), 36);
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let objects = server.backend.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].bucket, TEST_BUCKET);
    assert_eq!(objects[0].key, key);
    assert_eq!(objects[0].body, b"PNGDATA");
    assert_eq!(objects[0].content_type, "image/png");
}

#[tokio::test]
async fn test_upload_same_image_twice_gives_distinct_urls() {
    let server = TestServer::new().await;
    let image = BASE64_STANDARD.encode("identical");

    let first: serde_json::Value = server.upload(&image).await.json().await.unwrap();
    let second: serde_json::Value = server.upload(&image).await.json().await.unwrap();

    assert_ne!(first["url"], second["url"]);
    assert_eq!(server.backend.objects().len(), 2);
}

#[tokio::test]
async fn test_upload_labels_any_content_as_png() {
    let server = TestServer::new().await;
    let gif_header = b"GIF89a";

    let body: serde_json::Value = server
        .upload(&BASE64_STANDARD.encode(gif_header))
        .await
        .json()
        .await
        .unwrap();

    assert!(body["url"].as_str().unwrap().ends_with(".png"));
    assert_eq!(server.backend.objects()[0].content_type, "image/png");
}

#[tokio::test]
async fn test_upload_rejects_invalid_base64() {
    let server = TestServer::new().await;

    let response = server.upload("not base64!!").await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Invalid base64"));
    assert!(server.backend.objects().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_missing_image_field() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/upload-image"))
        .json(&serde_json::json!({ "picture": "UE5HREFUQQ==" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_upload_access_denied() {
    let server = TestServer::with_mode(BackendMode::Rejecting("AccessDenied")).await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Access denied"));
}

#[tokio::test]
async fn test_upload_missing_bucket() {
    let server = TestServer::with_mode(BackendMode::Rejecting("NoSuchBucket")).await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("does not exist"));
}

#[tokio::test]
async fn test_upload_other_backend_error_keeps_code() {
    let server = TestServer::with_mode(BackendMode::Rejecting("InternalError")).await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("InternalError"));
}

#[tokio::test]
async fn test_upload_without_client() {
    let server = TestServer::with_mode(BackendMode::NoClient).await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Storage backend unavailable")
    );
}

#[tokio::test]
async fn test_upload_unreachable_backend() {
    let server = TestServer::with_mode(BackendMode::Unreachable).await;

    let response = server.upload(&BASE64_STANDARD.encode("PNGDATA")).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Unexpected error")
    );
}

#[tokio::test]
async fn test_upload_accepts_images_larger_than_two_megabytes() {
    let server = TestServer::new().await;
    let image = vec![7u8; 2_500_000];

    let response = server.upload(&BASE64_STANDARD.encode(&image)).await;

    assert_eq!(response.status(), 200);
    let objects = server.backend.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].body.len(), image.len());
}

#[tokio::test]
async fn test_upload_accepts_line_wrapped_base64() {
    let server = TestServer::new().await;
    let image: Vec<u8> = (0u8..120).collect();
    let encoded = BASE64_STANDARD.encode(&image);
    let wrapped = encoded
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect::<Vec<_>>()
        .join("\n");

    let response = server.upload(&wrapped).await;

    assert_eq!(response.status(), 200);
    assert_eq!(server.backend.objects()[0].body, image);
}

#[tokio::test]
async fn test_upload_outcomes_are_counted_in_metrics() {
    let server = TestServer::new().await;

    assert_eq!(server.upload(&BASE64_STANDARD.encode("PNGDATA")).await.status(), 200);
    assert_eq!(server.upload("not base64!!").await.status(), 400);

    let metrics = server.metrics_text().await;
    assert!(metrics.contains(r#"s3_image_bridge_uploads_total{outcome="success"}"#));
    assert!(metrics.contains(r#"s3_image_bridge_errors_total{error_type="invalid_input"}"#));
}

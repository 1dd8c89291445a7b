mod common;

use axum::http::StatusCode;
use common::{file_part, TestApp};
use genai_gateway::services::providers::InlineData;
use genai_gateway::services::GenerativePart;
use reqwest::multipart::Form;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

#[tokio::test]
async fn image_and_prompt_are_sent_together() {
    let (app, mock) = TestApp::with_reply("a cat").await;

    let form = Form::new()
        .text("prompt", "what is this?")
        .part("image", file_part(PNG_BYTES, "cat.png", "image/png"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["output"], "a cat");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0], GenerativePart::text("what is this?"));
    assert_eq!(
        calls[0][1],
        GenerativePart::inline(PNG_BYTES, "image/png"),
    );

    assert_eq!(app.stored_uploads(), 0, "upload should be removed after success");
    app.cleanup().await;
}

#[tokio::test]
async fn image_part_order_does_not_depend_on_form_order() {
    let (app, mock) = TestApp::with_reply("ok").await;

    let form = Form::new()
        .part("image", file_part(PNG_BYTES, "photo.webp", "image/webp"))
        .text("prompt", "describe");

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    let calls = mock.calls();
    assert_eq!(calls[0][0].as_text(), Some("describe"));
    match &calls[0][1] {
        GenerativePart::InlineData(InlineData { mime_type, .. }) => {
            assert_eq!(mime_type, "image/webp")
        }
        other => panic!("expected inline data, got {:?}", other),
    }
    app.cleanup().await;
}

#[tokio::test]
async fn unknown_image_extension_is_sent_as_jpeg() {
    let (app, mock) = TestApp::with_reply("ok").await;

    // The declared content type is ignored; only the extension counts.
    let form = Form::new()
        .text("prompt", "describe")
        .part("image", file_part(PNG_BYTES, "scan.bmp", "image/bmp"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        mock.calls()[0][1],
        GenerativePart::inline(PNG_BYTES, "image/jpeg")
    );
    app.cleanup().await;
}

#[tokio::test]
async fn missing_prompt_is_rejected_and_upload_removed() {
    let (app, mock) = TestApp::with_reply("unused").await;

    let form = Form::new().part("image", file_part(PNG_BYTES, "cat.png", "image/png"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Prompt is required.");

    assert!(mock.calls().is_empty());
    assert_eq!(app.stored_uploads(), 0, "upload should be removed after rejection");
    app.cleanup().await;
}

#[tokio::test]
async fn missing_image_is_rejected() {
    let (app, mock) = TestApp::with_reply("unused").await;

    let form = Form::new().text("prompt", "what is this?");

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Image is required.");
    assert!(mock.calls().is_empty());
    app.cleanup().await;
}

#[tokio::test]
async fn upstream_failure_returns_500_and_removes_upload() {
    let (app, mock) = TestApp::with_failure("model overloaded").await;

    let form = Form::new()
        .text("prompt", "what is this?")
        .part("image", file_part(PNG_BYTES, "cat.jpg", "image/jpeg"));

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "model overloaded");

    assert_eq!(mock.calls().len(), 1);
    assert_eq!(app.stored_uploads(), 0, "upload should be removed after failure");
    app.cleanup().await;
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let (app, _mock) = TestApp::with_reply("unused").await;

    let response = app
        .client
        .post(app.url("/generate-from-image"))
        .json(&serde_json::json!({ "prompt": "hello" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
    app.cleanup().await;
}

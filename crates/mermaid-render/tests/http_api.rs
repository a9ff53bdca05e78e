#![allow(clippy::expect_used, clippy::unwrap_used)]

//! HTTP API behaviour through the full router.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use mermaid_render::http::router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{state, state_with, FakeConverter, PNG_BYTES, SAMPLE_SVG};

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_is_ok() {
    let app = router(state());
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn render_returns_envelope_and_diagram_is_retrievable() {
    let app = router(state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/rendering/render",
        Some(json!({ "mermaidCode": "graph TD\nA-->B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["renderedSvg"], SAMPLE_SVG);
    assert_eq!(body["data"]["diagramType"], "flowchart");

    let id = body["data"]["diagramId"].as_str().expect("id").to_string();
    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/rendering/diagram/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["renderStatus"], "success");
    assert_eq!(body["data"]["mermaidCode"], "graph TD\nA-->B");
    assert!(body["data"].get("error").is_none());
}

#[tokio::test]
async fn render_failure_is_422_and_failed_diagram_is_stored() {
    let (state, events) = state_with(FakeConverter { fail: false });
    let app = router(state);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/rendering/render",
        Some(json!({ "mermaidCode": "graph TD\ninvalid" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "RENDER_FAILED");
    assert_eq!(body["error"]["message"], "Parse error on line 2");

    let id = events.events()[0].aggregate_id;
    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/rendering/diagram/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["renderStatus"], "failed");
    assert_eq!(body["data"]["error"]["line"], 2);
}

#[tokio::test]
async fn blank_code_is_400() {
    let app = router(state());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/rendering/render",
        Some(json!({ "mermaidCode": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let app = router(state());

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/rendering/diagram/6f1c2b8e-8a4e-4a57-9d7c-0d3b0e4b8f11",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "DIAGRAM_NOT_FOUND");

    let (status, _) = send_json(&app, Method::GET, "/api/v1/rendering/diagram/nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn png_export_returns_attachment() {
    let app = router(state());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/export/png")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "mermaidCode": "graph TD\nA-->B",
                "options": { "width": 800, "height": 600, "fileName": "flow" }
            })
            .to_string(),
        ))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"flow.png\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(bytes.as_ref(), PNG_BYTES);
}

#[tokio::test]
async fn svg_export_returns_markup() {
    let app = router(state());
    let (status, bytes) = send(
        &app,
        Method::POST,
        "/api/v1/export/svg",
        Some(json!({ "mermaidCode": "graph TD" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).expect("utf8"), SAMPLE_SVG);
}

#[tokio::test]
async fn export_errors_are_mapped() {
    let app = router(state_with(FakeConverter { fail: true }).0);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/export/png",
        Some(json!({ "mermaidCode": "graph TD" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "EXPORT_FAILED");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/export/png",
        Some(json!({ "mermaidCode": "graph TD\ninvalid" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "RENDER_FAILED");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/export/png",
        Some(json!({ "mermaidCode": "graph TD", "options": { "fileName": "a/b" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn editor_session_flow() {
    let app = router(state());

    let (status, body) = send_json(&app, Method::POST, "/api/v1/editor/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["sessionId"].as_str().expect("id").to_string();
    let base = format!("/api/v1/editor/sessions/{id}");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("{base}/code"),
        Some(json!({ "code": "graph TD\nA-->B", "cursor": { "line": 1, "column": 5 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["canUndo"], true);
    assert_eq!(body["data"]["cursor"]["column"], 5);

    let (status, body) = send_json(&app, Method::POST, &format!("{base}/render"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rendered"], true);
    assert_eq!(body["data"]["render"]["renderedSvg"], SAMPLE_SVG);
    assert_eq!(body["data"]["session"]["isRenderPending"], false);

    let (status, body) = send_json(&app, Method::POST, &format!("{base}/undo"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentCode"], "");

    let (status, body) = send_json(&app, Method::POST, &format!("{base}/undo"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "HISTORY_EMPTY");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("{base}/cursor"),
        Some(json!({ "line": -1, "column": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Line number cannot be negative");
}

#[tokio::test]
async fn negative_png_dimensions_are_validation_errors() {
    let app = router(state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/export/png",
        Some(json!({ "mermaidCode": "graph TD", "options": { "width": -5 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Width must be greater than 0");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/export/png",
        Some(json!({ "mermaidCode": "graph TD", "options": { "height": 0 } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Height must be greater than 0");
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let app = router(state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/rendering/render",
        Some(json!({ "code": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("mermaidCode")));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/export/svg")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

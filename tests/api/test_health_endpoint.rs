// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use super::support::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use labreport_ocr::{
    api::{create_router, AppState},
    version,
    vision::{ocr::PreprocessOptions, OcrPipeline},
};
use tower::util::ServiceExt;

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_engine_version() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = OcrPipeline::new(FixedTextEngine::new(""), PreprocessOptions::default());
    let state = AppState::new(test_config(dir.path()), pipeline)
        .with_engine_version("tesseract 5.3.4");

    let response = create_router(state).oneshot(health_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], version::VERSION);
    assert_eq!(json["engine"], "fixed-text");
    assert_eq!(json["engine_version"], "tesseract 5.3.4");
    assert!(json.get("issues").is_none());
}

#[tokio::test]
async fn test_health_degraded_without_engine() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(""));

    let response = app.oneshot(health_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["issues"].as_array().unwrap().len(), 1);
}

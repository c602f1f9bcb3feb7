// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use super::support::*;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::util::ServiceExt;

#[tokio::test]
async fn test_index_serves_upload_form() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(""));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Lab Report OCR API"));
    assert!(page.contains("fetch('/get-lab-tests'"));
    assert!(page.contains("JSON.stringify(data, null, 2)"));
}

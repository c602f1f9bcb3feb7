// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for POST/GET /get-lab-tests

use super::support::*;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

const REPORT_TEXT: &str = "Hemoglobin: 13.5 g/dL (12.0-16.0)\n\
                           Glucose 180 mg/dL (70-110)\n\
                           Patient Name: John Doe\n";

#[tokio::test]
async fn test_upload_returns_parsed_lab_tests() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FixedTextEngine::new(REPORT_TEXT);
    let app = app_with_engine(test_config(dir.path()), engine.clone());

    let body = multipart_body("file", Some("report.png"), &report_png());
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_success"], true);

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(
        data[0],
        serde_json::json!({
            "test_name": "HEMOGLOBIN",
            "test_value": "13.5",
            "bio_reference_range": "12.0-16.0",
            "test_unit": "g/dL",
            "lab_test_out_of_range": false
        })
    );
    assert_eq!(data[1]["test_name"], "GLUCOSE");
    assert_eq!(data[1]["lab_test_out_of_range"], true);

    assert_eq!(engine.calls(), 1);
    assert!(dir_is_empty(dir.path()), "staged upload should be removed");
}

#[tokio::test]
async fn test_upload_without_filename_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(REPORT_TEXT));

    let body = multipart_body("file", Some(""), &report_png());
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_unreadable_image_yields_empty_data() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FixedTextEngine::new(REPORT_TEXT);
    let app = app_with_engine(test_config(dir.path()), engine.clone());

    let body = multipart_body("file", Some("scan.png"), b"definitely not an image");
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"is_success": true, "data": []}));
    assert_eq!(engine.calls(), 0, "engine must not run on undecodable input");
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_missing_engine_yields_empty_data() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), Arc::new(MissingEngine));

    let body = multipart_body("file", Some("report.png"), &report_png());
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_missing_file_field_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(REPORT_TEXT));

    let body = multipart_body("note", None, b"hello");
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"is_success": false, "error": "file is required"})
    );
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(REPORT_TEXT));

    let request = Request::builder()
        .method("POST")
        .uri("/get-lab-tests")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["is_success"], false);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.max_upload_bytes = 1024;
    let engine = FixedTextEngine::new(REPORT_TEXT);
    let app = app_with_engine(config, engine.clone());

    let body = multipart_body("file", Some("big.png"), &vec![0u8; 4096]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(engine.calls(), 0);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_upload_beyond_body_limit_is_payload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.max_upload_bytes = 1024;
    let engine = FixedTextEngine::new(REPORT_TEXT);
    let app = app_with_engine(config, engine.clone());

    // Well past the multipart overhead allowed on top of max_upload_bytes
    let body = multipart_body("file", Some("huge.png"), &vec![0u8; 200 * 1024]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "is_success": false,
            "error": "upload exceeds maximum size of 1024 bytes"
        })
    );
    assert_eq!(engine.calls(), 0);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_ocr_runs_are_bounded_by_max_concurrent_ocr() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.max_concurrent_ocr = 1;
    let engine = SlowEngine::new(REPORT_TEXT, Duration::from_millis(200));
    let app = app_with_engine(config, engine.clone());

    let first = app
        .clone()
        .oneshot(upload_request(multipart_body("file", Some("a.png"), &report_png())));
    let second = app.oneshot(upload_request(multipart_body("file", Some("b.png"), &report_png())));
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().status(), StatusCode::OK);
    assert_eq!(second.unwrap().status(), StatusCode::OK);
    assert_eq!(engine.calls(), 2);
    assert_eq!(engine.max_in_flight(), 1);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn test_staging_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let app = app_with_engine(test_config(&missing), FixedTextEngine::new(REPORT_TEXT));

    let body = multipart_body("file", Some("report.png"), &report_png());
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["is_success"], false);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(REPORT_TEXT));

    let request = Request::builder()
        .method("GET")
        .uri("/get-lab-tests")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "detail": "Method Not Allowed",
            "message": "This endpoint only accepts POST requests with a file upload"
        })
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_engine(test_config(dir.path()), FixedTextEngine::new(REPORT_TEXT));

    let body = multipart_body("file", Some("report.png"), &report_png());
    let mut request = upload_request(body);
    request.headers_mut().insert(
        header::ORIGIN,
        "https://portal.example.com".parse().unwrap(),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

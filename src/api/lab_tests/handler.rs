// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab test extraction endpoint handler

use axum::{
    extract::{FromRequest, Request, State},
    Json,
};
use axum_extra::extract::Multipart;
use std::path::Path;
use tracing::{error, info, warn};

use super::response::LabTestsResponse;
use super::upload::{read_file_field, staged_path};
use crate::api::errors::{ApiError, POST_ONLY_MESSAGE};
use crate::api::http_server::AppState;
use crate::lab::{format_output, parse_lab_tests, LabTest};

/// Characters of recognized text echoed to the log
const TEXT_PREVIEW_CHARS: usize = 100;

/// POST /get-lab-tests - Extract lab tests from an uploaded report image
///
/// # Request
/// `multipart/form-data` with the image in the `file` field.
///
/// # Response
/// - `is_success`: true
/// - `data`: lab tests found in the image (empty when nothing is recognized)
///
/// # Errors
/// - 400 Bad Request: body is not valid multipart
/// - 413 Payload Too Large: image exceeds the configured upload limit
/// - 422 Unprocessable Entity: no `file` field
/// - 500 Internal Server Error: the upload could not be staged
pub async fn get_lab_tests_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<LabTestsResponse>, ApiError> {
    let mut multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| {
            warn!("Rejected upload: {}", e);
            ApiError::InvalidRequest(e.to_string())
        })?;

    let upload = read_file_field(&mut multipart, state.config.max_upload_bytes).await?;
    info!(
        "Processing file: {}",
        upload.filename.as_deref().unwrap_or("<unnamed>")
    );

    let path = staged_path(&state.config.upload_dir, upload.filename.as_deref());
    if let Err(e) = tokio::fs::write(&path, &upload.bytes).await {
        error!("Error processing file: failed to save {}: {}", path.display(), e);
        return Err(ApiError::InternalError(e.to_string()));
    }
    info!("File saved to {}, running OCR...", path.display());

    let result = extract_lab_tests(&state, &path).await;

    match tokio::fs::remove_file(&path).await {
        Ok(()) => info!("Temporary file removed"),
        Err(e) => warn!("Failed to remove temporary file {}: {}", path.display(), e),
    }

    let data = result.inspect_err(|e| error!("Error processing file: {}", e))?;
    Ok(Json(LabTestsResponse::success(data)))
}

/// GET /get-lab-tests - Only POST is supported
pub async fn get_lab_tests_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(POST_ONLY_MESSAGE.to_string())
}

async fn extract_lab_tests(state: &AppState, path: &Path) -> Result<Vec<LabTest>, ApiError> {
    let _permit = state
        .ocr_permits
        .acquire()
        .await
        .map_err(|_| ApiError::InternalError("OCR worker pool is shut down".to_string()))?;

    let text = state.pipeline.extract_text_lenient(path).await;
    let preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
    info!("Extracted text: {}...", preview);

    let parsed = parse_lab_tests(&text);
    info!("Found {} lab tests", parsed.len());

    Ok(format_output(&parsed))
}

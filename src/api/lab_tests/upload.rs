// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload handling for report images

use axum::{body::Bytes, http::StatusCode};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::api::errors::ApiError;

/// Name of the multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Extension used when the client sends no filename
pub const DEFAULT_EXTENSION: &str = ".png";

/// An uploaded report image
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Bytes,
}

/// Map a multipart failure, keeping body-limit hits distinct from bad input
fn multipart_error(e: MultipartError, context: &str, max_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge {
            size: None,
            limit: max_bytes,
        };
    }
    ApiError::InvalidRequest(format!("{}: {}", context, e))
}

/// Read the `file` field from a multipart body, ignoring other fields
pub async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart field", max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read upload", max_bytes))?;

        if bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge {
                size: Some(bytes.len()),
                limit: max_bytes,
            });
        }

        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::MissingField(FILE_FIELD.to_string()))
}

/// Extension (with leading dot) for the staged copy of an upload
///
/// No filename gives `.png`; a filename without an extension gives no
/// extension at all.
pub fn upload_extension(filename: Option<&str>) -> String {
    let Some(name) = filename.filter(|n| !n.is_empty()) else {
        return DEFAULT_EXTENSION.to_string();
    };

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Unique staging path inside `upload_dir`
pub fn staged_path(upload_dir: &Path, filename: Option<&str>) -> PathBuf {
    upload_dir.join(format!("{}{}", Uuid::new_v4(), upload_extension(filename)))
}

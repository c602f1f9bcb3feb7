// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message returned for non-POST requests to the upload endpoint
pub const POST_ONLY_MESSAGE: &str = "This endpoint only accepts POST requests with a file upload";

/// JSON error bodies
///
/// Upload failures use the same `is_success` envelope as successful
/// responses; method errors carry a `detail`/`message` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorResponse {
    Detail { detail: String, message: String },
    Failure { is_success: bool, error: String },
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MethodNotAllowed(String),
    InvalidRequest(String),
    MissingField(String),
    /// `size` is unknown when the body limit cut the upload short
    PayloadTooLarge { size: Option<usize>, limit: usize },
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::MethodNotAllowed(msg) => ErrorResponse::Detail {
                detail: "Method Not Allowed".to_string(),
                message: msg.clone(),
            },
            ApiError::InvalidRequest(msg) | ApiError::InternalError(msg) => {
                ErrorResponse::Failure {
                    is_success: false,
                    error: msg.clone(),
                }
            }
            ApiError::MissingField(field) => ErrorResponse::Failure {
                is_success: false,
                error: format!("{} is required", field),
            },
            ApiError::PayloadTooLarge { size, limit } => ErrorResponse::Failure {
                is_success: false,
                error: match size {
                    Some(size) => format!(
                        "upload of {} bytes exceeds maximum size of {} bytes",
                        size, limit
                    ),
                    None => format!("upload exceeds maximum size of {} bytes", limit),
                },
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MethodNotAllowed(msg) => write!(f, "Method not allowed: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::MissingField(field) => write!(f, "Missing field: {}", field),
            ApiError::PayloadTooLarge {
                size: Some(size),
                limit,
            } => write!(f, "Payload too large: {} bytes (max {})", size, limit),
            ApiError::PayloadTooLarge { size: None, limit } => {
                write!(f, "Payload too large (max {} bytes)", limit)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        match self {
            ApiError::MethodNotAllowed(_) => {
                (status, [(header::ALLOW, "POST")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

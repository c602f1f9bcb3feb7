// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use super::index::INDEX_HTML;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// GET / - Upload form
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut issues = Vec::new();
    if state.engine_version.is_none() {
        issues.push(format!("{} is not available", state.pipeline.engine_name()));
    }

    Json(HealthResponse {
        status: if issues.is_empty() { "ok" } else { "degraded" }.to_string(),
        version: version::VERSION.to_string(),
        engine: state.pipeline.engine_name().to_string(),
        engine_version: state.engine_version.as_deref().map(str::to_string),
        issues: if issues.is_empty() { None } else { Some(issues) },
    })
}

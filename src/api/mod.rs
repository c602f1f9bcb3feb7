// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod index;
pub mod lab_tests;

pub use errors::{ApiError, ErrorResponse, POST_ONLY_MESSAGE};
pub use handlers::HealthResponse;
pub use http_server::{create_router, start_server, AppState};
pub use lab_tests::LabTestsResponse;

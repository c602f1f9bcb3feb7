// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab test extraction endpoint module
//!
//! Provides POST /get-lab-tests for extracting lab results from an uploaded
//! report image.

pub mod handler;
pub mod response;
pub mod upload;

pub use handler::{get_lab_tests_handler, get_lab_tests_method_not_allowed};
pub use response::LabTestsResponse;

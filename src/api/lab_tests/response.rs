// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab test extraction response types

use serde::{Deserialize, Serialize};

use crate::lab::LabTest;

/// Successful extraction response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTestsResponse {
    /// Always true; failures use `ErrorResponse`
    pub is_success: bool,
    /// Extracted lab tests, possibly empty
    pub data: Vec<LabTest>,
}

impl LabTestsResponse {
    pub fn success(data: Vec<LabTest>) -> Self {
        Self {
            is_success: true,
            data,
        }
    }
}

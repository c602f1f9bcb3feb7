// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab test result types

use serde::{Deserialize, Serialize};

/// A single lab test row recovered from OCR text
///
/// Field names are part of the public JSON contract and stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    /// Test name, upper-cased (e.g. "HEMOGLOBIN")
    pub test_name: String,
    /// Measured value exactly as it appeared in the text
    pub test_value: String,
    /// Reference range as "low-high", empty when absent
    pub bio_reference_range: String,
    /// Unit (e.g. "g/dL", "%"), empty when absent
    pub test_unit: String,
    /// Whether the value falls outside the reference range
    pub lab_test_out_of_range: bool,
}

/// Split a "low-high" reference range into its numeric bounds
pub fn parse_reference_range(range: &str) -> Option<(f64, f64)> {
    let mut parts = range.split('-');
    let low = parts.next()?.trim().parse::<f64>().ok()?;
    let high = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((low, high))
}

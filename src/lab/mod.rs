// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lab report parsing
//!
//! Turns raw OCR text into structured lab test rows and flags values that
//! fall outside their printed reference range.

pub mod parser;
pub mod types;

pub use parser::{format_output, parse_lab_tests, parse_line};
pub use types::{parse_reference_range, LabTest};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod lab;
pub mod version;
pub mod vision;

pub use batch::{process_all_images, BatchError, BatchSummary};
pub use config::{ConfigError, OcrConfig, ServiceConfig};
pub use lab::{format_output, parse_lab_tests, LabTest};
pub use vision::{OcrEngine, OcrError, OcrPipeline, TesseractEngine};

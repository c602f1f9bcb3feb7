// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tesseract-backed OCR
//!
//! Components:
//! - `preprocessing` - Binarization and denoising before recognition
//! - `engine` - Engine trait and error type
//! - `tesseract` - Tesseract CLI engine
//! - `pipeline` - Combined decode, preprocess and recognize flow

pub mod engine;
pub mod pipeline;
pub mod preprocessing;
pub mod tesseract;

pub use engine::{OcrEngine, OcrError};
pub use pipeline::OcrPipeline;
pub use preprocessing::{preprocess, PreprocessOptions, ThresholdMode};
pub use tesseract::TesseractEngine;

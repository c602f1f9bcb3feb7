// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for lab report images
//!
//! This module provides:
//! - Image decoding and format detection
//! - OCR preprocessing (grayscale, Otsu binarization, median denoise)
//! - Text recognition through the Tesseract CLI

pub mod image_utils;
pub mod ocr;

pub use image_utils::{
    decode_image_bytes, detect_format, is_supported_image_path, ImageError, ImageInfo,
};
pub use ocr::{OcrEngine, OcrError, OcrPipeline, TesseractEngine};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR engine abstraction

use async_trait::async_trait;
use image::GrayImage;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::vision::image_utils::ImageError;

/// Errors raised while turning an image into text
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("Failed to encode preprocessed image: {0}")]
    Encode(String),

    #[error("Preprocessing task failed: {0}")]
    Preprocess(String),

    #[error("OCR engine '{0}' not found, is Tesseract installed and on PATH?")]
    EngineNotFound(String),

    #[error("OCR engine exited with {code:?}: {stderr}")]
    EngineFailed { code: Option<i32>, stderr: String },

    #[error("OCR engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text recognizer operating on a preprocessed (binarized) page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Short engine identifier for logs and health output
    fn name(&self) -> &'static str;

    /// Recognize all text on the page, lines separated by newlines
    async fn recognize(&self, image: GrayImage) -> Result<String, OcrError>;
}

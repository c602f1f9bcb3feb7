// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image-to-text pipeline: decode, preprocess, recognize

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::engine::{OcrEngine, OcrError};
use super::preprocessing::{preprocess, PreprocessOptions};
use super::tesseract::TesseractEngine;
use crate::config::OcrConfig;
use crate::vision::image_utils::decode_image_bytes;

/// Shared OCR pipeline
///
/// Decoding and preprocessing are CPU bound and run on the blocking pool;
/// recognition is delegated to the configured engine.
#[derive(Clone)]
pub struct OcrPipeline {
    engine: Arc<dyn OcrEngine>,
    options: PreprocessOptions,
}

impl OcrPipeline {
    pub fn new(engine: Arc<dyn OcrEngine>, options: PreprocessOptions) -> Self {
        Self { engine, options }
    }

    /// Pipeline backed by the Tesseract CLI
    pub fn tesseract(config: &OcrConfig) -> Self {
        Self::new(
            Arc::new(TesseractEngine::new(config)),
            config.preprocess.clone(),
        )
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Extract text from an image file
    pub async fn extract_text(&self, path: &Path) -> Result<String, OcrError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| OcrError::ReadImage {
                path: path.to_path_buf(),
                source,
            })?;
        self.extract_text_from_bytes(bytes).await
    }

    /// Extract text from encoded image bytes
    pub async fn extract_text_from_bytes(&self, bytes: Vec<u8>) -> Result<String, OcrError> {
        let started = Instant::now();
        let options = self.options.clone();

        let page = tokio::task::spawn_blocking(move || -> Result<_, OcrError> {
            let (image, info) = decode_image_bytes(&bytes)?;
            debug!(
                "Decoded image: {}x{}, {} bytes, {:?}",
                info.width, info.height, info.size_bytes, info.format
            );
            Ok(preprocess(&image, &options))
        })
        .await
        .map_err(|e| OcrError::Preprocess(e.to_string()))??;

        let text = self.engine.recognize(page).await?;

        info!(
            "OCR extraction completed: {} characters extracted in {}ms",
            text.chars().count(),
            started.elapsed().as_millis()
        );
        Ok(text)
    }

    /// Extract text, logging any failure and returning an empty string
    ///
    /// An unreadable image or a broken engine yields no text, which in turn
    /// yields no lab tests.
    pub async fn extract_text_lenient(&self, path: &Path) -> String {
        match self.extract_text(path).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error in OCR extraction for {}: {}", path.display(), e);
                String::new()
            }
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch processing of a directory of lab report images
//!
//! Every supported image in the input directory is run through the OCR
//! pipeline and parser; results land in `<output_dir>/<stem>.json`.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::lab::{parse_lab_tests, LabTest};
use crate::vision::{is_supported_image_path, OcrPipeline};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input directory {path}: {source}")]
    ReadInputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write results to {path}: {source}")]
    WriteResults {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Images processed
    pub processed: usize,
    /// Lab tests found across all images
    pub lab_tests: usize,
    /// Lab tests flagged out of range
    pub out_of_range: usize,
    /// JSON files written, in processing order
    pub outputs: Vec<PathBuf>,
}

/// Serialize lab tests as a JSON array indented by four spaces
///
/// Non-ASCII characters are written verbatim.
pub fn to_pretty_json(tests: &[LabTest]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tests.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// `<output_dir>/<image stem>.json`
pub fn output_path_for(image: &Path, output_dir: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let mut name = stem;
    name.push(".json");
    output_dir.join(name)
}

/// Supported images directly inside `input_dir`, sorted by file name
pub async fn list_images(input_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let read_err = |source| BatchError::ReadInputDir {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(input_dir).await.map_err(read_err)?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if is_file && is_supported_image_path(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Process every image in `input_dir`, writing one JSON file per image
///
/// A missing input directory is logged and yields an empty summary.
pub async fn process_all_images(
    pipeline: &OcrPipeline,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary, BatchError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| BatchError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

    if !tokio::fs::try_exists(input_dir).await.unwrap_or(false) {
        error!("Input directory '{}' does not exist", input_dir.display());
        return Ok(BatchSummary::default());
    }

    let mut summary = BatchSummary::default();
    for path in list_images(input_dir).await? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing: {}", file_name);

        let text = pipeline.extract_text_lenient(&path).await;
        let parsed = parse_lab_tests(&text);

        let output_path = output_path_for(&path, output_dir);
        let json = to_pretty_json(&parsed)?;
        tokio::fs::write(&output_path, json)
            .await
            .map_err(|source| BatchError::WriteResults {
                path: output_path.clone(),
                source,
            })?;
        info!("Saved results to: {}", output_path.display());

        summary.processed += 1;
        summary.lab_tests += parsed.len();
        summary.out_of_range += parsed.iter().filter(|t| t.lab_test_out_of_range).count();
        summary.outputs.push(output_path);
    }

    info!(
        "Batch processing complete. Processed {} images.",
        summary.processed
    );
    Ok(summary)
}

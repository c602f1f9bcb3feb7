// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::batch::{process_all_images, to_pretty_json};
use crate::config::{BatchConfig, OcrConfig};
use crate::lab::{format_output, parse_lab_tests};
use crate::vision::{OcrPipeline, TesseractEngine};

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory of report images (defaults to BATCH_INPUT_DIR or `lbmaske`)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory for JSON results (defaults to BATCH_OUTPUT_DIR or `output`)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Report image to process
    pub image: PathBuf,

    /// Print the recognized text instead of parsed lab tests
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File containing OCR output
    pub text_file: PathBuf,
}

fn load_ocr_config() -> Result<OcrConfig> {
    let config = OcrConfig::from_env();
    config.validate()?;
    Ok(config)
}

async fn warn_if_engine_missing(config: &OcrConfig) {
    if let Err(e) = TesseractEngine::new(config).probe().await {
        warn!("Tesseract is not usable ({}); images will yield no text", e);
    }
}

/// Run batch mode over a directory of images
pub async fn run_batch(args: BatchArgs) -> Result<()> {
    let ocr = load_ocr_config()?;
    let defaults = BatchConfig::from_env();
    let input_dir = args.input_dir.unwrap_or(defaults.input_dir);
    let output_dir = args.output_dir.unwrap_or(defaults.output_dir);

    warn_if_engine_missing(&ocr).await;
    let pipeline = OcrPipeline::tesseract(&ocr);

    let summary = process_all_images(&pipeline, &input_dir, &output_dir).await?;
    info!(
        "{} lab tests found, {} out of range",
        summary.lab_tests, summary.out_of_range
    );
    Ok(())
}

/// Run OCR on one image and print the result
pub async fn extract(args: ExtractArgs) -> Result<()> {
    let ocr = load_ocr_config()?;
    let pipeline = OcrPipeline::tesseract(&ocr);

    let text = pipeline
        .extract_text(&args.image)
        .await
        .with_context(|| format!("OCR failed for {}", args.image.display()))?;

    if args.raw {
        println!("{}", text);
        return Ok(());
    }

    let tests = format_output(&parse_lab_tests(&text));
    println!("{}", to_pretty_json(&tests)?);
    Ok(())
}

/// Parse a saved OCR text file and print the result
pub async fn parse(args: ParseArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.text_file)
        .await
        .with_context(|| format!("Failed to read {}", args.text_file.display()))?;

    let tests = format_output(&parse_lab_tests(&text));
    println!("{}", to_pretty_json(&tests)?);
    Ok(())
}

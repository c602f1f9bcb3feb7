// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod lab_report;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Lab Report OCR CLI
#[derive(Parser, Debug)]
#[command(name = "labreport-ocr-cli")]
#[command(version)]
#[command(about = "Extract lab test results from report images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every image in a directory, writing one JSON file per image
    Batch(lab_report::BatchArgs),

    /// Run OCR on a single image and print the lab tests
    Extract(lab_report::ExtractArgs),

    /// Parse an OCR text dump and print the lab tests
    Parse(lab_report::ParseArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Batch(args) => lab_report::run_batch(args).await,
        Commands::Extract(args) => lab_report::extract(args).await,
        Commands::Parse(args) => lab_report::parse(args).await,
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tesseract command-line engine
//!
//! The preprocessed page is written to a temporary PNG and handed to the
//! `tesseract` binary, which prints the recognized text on stdout.

use async_trait::async_trait;
use image::{GrayImage, ImageFormat};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use super::engine::{OcrEngine, OcrError};
use crate::config::OcrConfig;

/// OCR via the Tesseract CLI
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    oem: u8,
    psm: u8,
    language: Option<String>,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            oem: config.oem,
            psm: config.psm,
            language: config.language.clone(),
            timeout: config.timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments for recognizing `input`, text written to stdout
    pub fn recognize_args(&self, input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.as_os_str().to_owned(),
            "stdout".into(),
            "--oem".into(),
            self.oem.to_string().into(),
            "--psm".into(),
            self.psm.to_string().into(),
        ];
        if let Some(ref lang) = self.language {
            args.push("-l".into());
            args.push(lang.into());
        }
        args
    }

    /// Run `tesseract --version` and return its first line
    pub async fn probe(&self) -> Result<String, OcrError> {
        let output = self.run([OsString::from("--version")]).await?;
        // Older releases print the version banner on stderr
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        Ok(text.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn run<I>(&self, args: I) -> Result<Output, OcrError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineNotFound(self.command.clone()),
                _ => OcrError::Io(e),
            })?;

        // Dropping the wait future on timeout kills the child
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image: GrayImage) -> Result<String, OcrError> {
        let input = tokio::task::spawn_blocking(move || -> Result<NamedTempFile, OcrError> {
            let file = tempfile::Builder::new()
                .prefix("labreport-ocr-")
                .suffix(".png")
                .tempfile()?;
            image
                .save_with_format(file.path(), ImageFormat::Png)
                .map_err(|e| OcrError::Encode(e.to_string()))?;
            Ok(file)
        })
        .await
        .map_err(|e| OcrError::Encode(e.to_string()))??;

        debug!("Running {} on {}", self.command, input.path().display());
        let output = self.run(self.recognize_args(input.path())).await?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

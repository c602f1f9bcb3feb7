// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration loaded from environment variables
//!
//! A `.env` file in the working directory is honored by the binaries
//! (via `dotenv`) before `ServiceConfig::from_env` runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::vision::ocr::preprocessing::{PreprocessOptions, ThresholdMode, DEFAULT_MEDIAN_KERNEL};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default upload size limit (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[cfg(windows)]
const DEFAULT_TESSERACT_CMD: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";
#[cfg(not(windows))]
const DEFAULT_TESSERACT_CMD: &str = "tesseract";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Tesseract and preprocessing settings
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Tesseract executable, looked up on PATH when not absolute
    pub tesseract_cmd: String,
    /// OCR engine mode (`--oem`)
    pub oem: u8,
    /// Page segmentation mode (`--psm`), 6 = single uniform block of text
    pub psm: u8,
    /// Language pack(s) (`-l`), Tesseract's default when unset
    pub language: Option<String>,
    /// Upper bound on a single Tesseract run
    pub timeout: Duration,
    pub preprocess: PreprocessOptions,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: DEFAULT_TESSERACT_CMD.to_string(),
            oem: 3,
            psm: 6,
            language: None,
            timeout: Duration::from_secs(60),
            preprocess: PreprocessOptions::default(),
        }
    }
}

impl OcrConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tesseract_cmd: env::var("TESSERACT_CMD")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.tesseract_cmd),
            oem: env_parse("TESSERACT_OEM", defaults.oem),
            psm: env_parse("TESSERACT_PSM", defaults.psm),
            language: env::var("TESSERACT_LANG")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            timeout: Duration::from_secs(env_parse(
                "OCR_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            preprocess: PreprocessOptions {
                threshold: env_parse("OCR_THRESHOLD", ThresholdMode::Otsu),
                median_kernel: env_parse("OCR_MEDIAN_KERNEL", DEFAULT_MEDIAN_KERNEL),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tesseract_cmd.trim().is_empty() {
            return Err(invalid("tesseract_cmd", "must not be empty"));
        }
        if self.oem > 3 {
            return Err(invalid("oem", format!("must be 0-3, got {}", self.oem)));
        }
        if self.psm > 13 {
            return Err(invalid("psm", format!("must be 0-13, got {}", self.psm)));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout", "must be greater than 0"));
        }
        let kernel = self.preprocess.median_kernel;
        if kernel == 0 || kernel % 2 == 0 {
            return Err(invalid(
                "median_kernel",
                format!("must be a positive odd number, got {}", kernel),
            ));
        }
        Ok(())
    }
}

/// Directories used by batch mode
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("lbmaske"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl BatchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_dir: env::var("BATCH_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: env::var("BATCH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Where uploads are staged while they are processed
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Concurrent OCR jobs; further requests wait for a slot
    pub max_concurrent_ocr: usize,
    pub cors_allowed_origins: Vec<String>,
    pub ocr: OcrConfig,
    pub batch: BatchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("temp_uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_ocr: default_concurrency(),
            cors_allowed_origins: vec!["*".to_string()],
            ocr: OcrConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_concurrent_ocr: env_parse("MAX_CONCURRENT_OCR", defaults.max_concurrent_ocr),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_allowed_origins),
            ocr: OcrConfig::from_env(),
            batch: BatchConfig::from_env(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("port", "must be greater than 0"));
        }
        if self.max_upload_bytes == 0 {
            return Err(invalid("max_upload_bytes", "must be greater than 0"));
        }
        if self.max_concurrent_ocr == 0 {
            return Err(invalid("max_concurrent_ocr", "must be greater than 0"));
        }
        self.ocr.validate()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether CORS is open to every origin
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.is_empty() || self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use labreport_ocr::{
    api::{start_server, AppState},
    config::ServiceConfig,
    version,
    vision::{OcrPipeline, TesseractEngine},
};
use std::env;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so it can set RUST_LOG
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...\n", version::get_version_string());

    let config = ServiceConfig::from_env();
    config.validate()?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // The server still starts without Tesseract; uploads then yield no tests
    let engine_version = match TesseractEngine::new(&config.ocr).probe().await {
        Ok(banner) => {
            info!("✅ OCR engine available: {}", banner);
            Some(banner)
        }
        Err(e) => {
            warn!(
                "⚠️  Tesseract not usable at '{}': {}",
                config.ocr.tesseract_cmd, e
            );
            None
        }
    };

    let pipeline = OcrPipeline::tesseract(&config.ocr);
    let mut state = AppState::new(config.clone(), pipeline);
    if let Some(banner) = engine_version {
        state = state.with_engine_version(banner);
    }

    println!("📡 Endpoints on http://{}:", config.listen_addr());
    println!("   GET  /               - Upload page");
    println!("   POST /get-lab-tests  - Extract lab tests from an image");
    println!("   GET  /health         - Health check");
    println!();

    start_server(state).await
}

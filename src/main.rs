mod config;
mod error;
mod gallery;
mod pager;
mod templates;
mod walker;
mod web_server;

use crate::config::{AppConfig, Cli};
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::new(&cli)?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting picture gallery");
    log::debug!("Loaded configuration: {:?}", config);

    if let Err(e) = walker::ensure_directory(Path::new(&config.pictures_directory)) {
        log::error!("Failed to create pictures directory: {}", e);
        return Err(e.into());
    }

    if !config.template_path().is_file() {
        log::warn!(
            "Template {:?} not found; the gallery page will fail until it exists",
            config.template_path()
        );
    }

    if let Err(e) = web_server::start_web_server(Arc::new(config)).await {
        log::error!("Web server error: {}", e);
        return Err(e.into());
    }

    info!("Picture gallery stopped");

    Ok(())
}

#![forbid(unsafe_code)]

mod color;
mod config;
mod constants;
mod geometry;
mod gui;
mod hotkeys;
mod overlay;
mod profiles;

use anyhow::Result;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting crosshair overlay");
    gui::run_gui()
}

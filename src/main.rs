//! # pad-mapper
//!
//! Drive keyboard/mouse-only applications with a gamepad.
//!
//! The process takes no arguments. It reads its runtime settings from
//! `$PAD_MAPPER_CONFIG` (default `config/default.toml`), starts the polling
//! worker and runs until Ctrl+C.

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use pad_mapper::config::{Config, LoggingConfig};
use pad_mapper::controller::EvdevGamepadReader;
use pad_mapper::mapping::{MappingEngine, DEFAULT_TABLE};
use pad_mapper::output::UinputEmitter;
use pad_mapper::scheduler::{CancelToken, PollingScheduler, SchedulerSettings};

/// Sets up console logging and, when enabled, a daily-rolling log file.
///
/// The returned guard flushes the file writer on drop and must live until exit.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = if config.file_enabled {
        let appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Main entry point for pad-mapper
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load and validate configuration
///    - Set up logging
///    - Open the gamepad and create the virtual keyboard/mouse
///
/// 2. **Main Loop**
///    - Runs on the dedicated polling thread (see `PollingScheduler`)
///    - This task only waits for Ctrl+C
///
/// 3. **Graceful Shutdown**
///    - Cancel the worker and wait for its current tick to finish
///    - Log the session summary
///
/// # Errors
///
/// Returns error if:
/// - The configuration file is invalid
/// - No gamepad is found
/// - `/dev/uinput` is not writable
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default(Config::path_from_env())
        .context("Failed to load configuration")?;

    let _log_guard = init_logging(&config.logging);

    info!("pad-mapper v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(problem) = DEFAULT_TABLE.check() {
        bail!("Invalid mapping table: {}", problem);
    }

    let reader = EvdevGamepadReader::from_config(&config.controller)
        .context("Failed to open gamepad (is it connected and readable?)")?;
    info!("Gamepads: {:?}", reader.paths());

    let emitter = UinputEmitter::create(&config.emitter.device_name)
        .context("Failed to create virtual input device (is /dev/uinput writable?)")?;

    let scheduler = PollingScheduler::new(
        reader,
        emitter,
        MappingEngine::new(DEFAULT_TABLE),
        SchedulerSettings::from_config(&config),
    );

    let cancel = CancelToken::new();
    let worker = scheduler.spawn(cancel.clone())?;

    info!("Mapper running. Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");
    cancel.cancel();

    let stats = tokio::task::spawn_blocking(move || worker.join())
        .await?
        .map_err(|_| anyhow!("Polling thread panicked"))?;

    info!("Session summary: {}", stats.to_json()?);

    Ok(())
}

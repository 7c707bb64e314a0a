//! Diagnostic file logging, independent of console output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Set up an append-only log file under `log_dir`.
///
/// Console output is handled separately by the [`crate::ui`] module; the file
/// log carries timestamped, leveled lines without ANSI codes. The returned
/// guard must be held for the lifetime of the program to keep the
/// non-blocking writer flushing.
pub fn setup(log_dir: &Path, debug_enabled: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = rolling::never(log_dir, "archpkg.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("installing global log subscriber")?;

    tracing::debug!(dir = %log_dir.display(), debug_mode = debug_enabled, "logging initialized");

    Ok(guard)
}

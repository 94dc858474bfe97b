//! Logging bootstrap for hosts embedding the engine.
//!
//! Library code only emits `tracing` events; hosts that want them on disk
//! call [`init_logging`] once at startup. Filtering follows the standard
//! `RUST_LOG` environment variable, defaulting to `info`.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a daily-rolling file subscriber under `~/.classmap/logs`, plus an
/// ANSI stderr layer when `to_stderr` is set. The returned guard flushes the
/// writer on drop; hold it for the life of the process.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let log_dir = log_directory();
    let _ = std::fs::create_dir_all(&log_dir);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        &log_dir, component,
    ));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    } else {
        registry.init();
    }

    guard
}

fn log_directory() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".classmap").join("logs")
}

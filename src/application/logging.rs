//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: a console layer plus an append-only,
//! non-ANSI file layer under the configured log directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::SystemConfig;

pub const DEFAULT_FILTER: &str =
    "info,hyper=warn,reqwest=warn,tungstenite=warn,tokio_tungstenite=warn,rustls=warn";

/// The returned guard flushes the file writer on drop; keep it alive for the whole run.
pub fn init(system: &SystemConfig) -> Result<WorkerGuard> {
    let log_dir = Path::new(&system.log_dir);
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    }

    let file_appender = tracing_appender::rolling::never(log_dir, &system.log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

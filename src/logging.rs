use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

const LOG_FILE_PREFIX: &str = "backlight-arbiter.log";

/// Keeps the non-blocking file writer alive; dropping it flushes pending
/// records.
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    if logging_config.filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }

    let (file_layer, worker_guard) = match &logging_config.dir {
        Some(dir) => {
            let log_dir = resolve_log_dir(dir)?;
            fs::create_dir_all(&log_dir).with_context(|| {
                format!("failed to create logging directory {}", log_dir.display())
            })?;
            let appender = build_rolling_appender(&log_dir, &logging_config.rotation);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(build_env_filter(&logging_config.filter)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = if logging_config.stderr_enabled {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(build_env_filter(&logging_config.filter)?),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = ?logging_config.dir,
        filter = %logging_config.filter,
        rotation = ?logging_config.rotation,
        stderr_enabled = logging_config.stderr_enabled,
        "logging_initialized"
    );

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .with_context(|| format!("failed to parse logging.filter '{}'", filter))
}

fn build_rolling_appender(log_dir: &Path, rotation: &LoggingRotation) -> RollingFileAppender {
    match rotation {
        LoggingRotation::Daily => rolling::daily(log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(log_dir, LOG_FILE_PREFIX),
    }
}

fn resolve_log_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    Ok(std::env::current_dir()
        .context("failed to read current working directory for logging.dir resolution")?
        .join(dir))
}

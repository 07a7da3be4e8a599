//! Shared observability helpers for the binary and integration tests.
//!
//! [`init_logging`] installs one global `tracing` subscriber writing into a
//! daily rolling file, optionally mirrored to `stderr` so progress lines
//! (selector chosen, message count, character count) reach the terminal.
//! Repeat callers are no-ops and receive the originally resolved log path.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "SCRIBE_LOG_DIR";

/// Encoding for both the file and the `stderr` mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Inputs to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the log file stem and the default directory.
    pub app_name: &'static str,
    /// Log directory. `None` means `SCRIBE_LOG_DIR`, then the platform data dir.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to `stderr`.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "ticket-scribe",
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global subscriber. Later calls return the first call's log path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| log_dir_for(config.app_name));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log dir {}", dir.display()))?;

    let stem = format!("{}.log", config.app_name);
    let appender = rolling::daily(&dir, &stem);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::with_capacity(2);
    layers.push(match config.format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    });
    if config.emit_stderr {
        layers.push(match config.format {
            LogFormat::Text => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        });
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    // rolling::daily suffixes the stem with the current date
    let path = dir.join(format!("{stem}.{}", Local::now().format("%Y-%m-%d")));
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

/// `SCRIBE_LOG_DIR` when set, otherwise `<data dir>/<app>/logs`.
fn log_dir_for(app_name: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_name)
        .join("logs")
}

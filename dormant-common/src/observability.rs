//! Logging setup shared by the binary and integration tests.
//!
//! Events always go to a daily rolling file so the console stays free for the
//! progress line and the report. Call [`init_logging`] once near process start;
//! later calls are no-ops that hand back the resolved log file path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "DORMANT_LOG_DIR";
const LOG_FORMAT_ENV: &str = "DORMANT_LOG_FORMAT";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Reads `DORMANT_LOG_FORMAT`; anything other than `json` means text.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the log directory and file name.
    pub app_name: &'static str,
    /// Explicit log directory. Falls back to `DORMANT_LOG_DIR`, then the
    /// platform data dir.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to `stderr`.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "dormant",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::from_env(),
            default_filter: "info",
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Returns the log file path for the current day.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{}.log", config.app_name);
    // rolling::daily appends the date as a suffix
    let today = Local::now().format("%Y-%m-%d").to_string();
    let full_path = dir.join(format!("{file_name}.{today}"));

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
    let _ = LOG_GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let json = config.format == LogFormat::Json;
    let (text_file, json_file) = if json {
        (None, Some(fmt::layer().json().with_writer(writer)))
    } else {
        (Some(fmt::layer().with_writer(writer).with_ansi(false)), None)
    };
    let text_stderr =
        (config.emit_stderr && !json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json_stderr =
        (config.emit_stderr && json).then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_file)
        .with(json_file)
        .with(text_stderr)
        .with(json_stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }
    match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => expand_home(Path::new(&dir)),
        _ => default_data_dir(app_name),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.to_str().and_then(|s| s.strip_prefix("~/")), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(app_name),
        Err(_) => PathBuf::from(".").join(app_name),
    }
}

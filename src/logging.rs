//! Logging setup
//!
//! One-shot commands log to stderr. The terminal UI owns the screen, so it
//! logs to a timestamped file under the data directory instead. Only the
//! newest [`MAX_LOG_FILES`] files are kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::storage::Config;

const LOG_LEVEL_ENV: &str = "DAYLIST_LOG";
const LOG_FILE_PREFIX: &str = "daylist-";

/// Log files kept in the log directory, including the current one
pub const MAX_LOG_FILES: usize = 10;

/// Keeps the log writer alive
///
/// File logging is buffered on a worker thread; dropping the guard flushes
/// the remaining lines. Hold it until the program is done logging.
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LogGuard {
    path: Option<PathBuf>,
    _worker: Option<WorkerGuard>,
}

impl LogGuard {
    /// Returns the log file path when logging to a file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Installs the global subscriber
pub fn init_logging(target: LogTarget, verbose: bool) -> Result<LogGuard> {
    let env_filter = build_log_filter(verbose);

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(layer)
                .try_init()
                .ok();
            Ok(LogGuard::default())
        }
        LogTarget::File => {
            let log_dir = Config::log_dir().context("Could not determine log directory")?;
            fs::create_dir_all(&log_dir)
                .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

            let pruned = prune_old_logs(&log_dir, MAX_LOG_FILES - 1).unwrap_or(0);

            let log_file_path = log_file_path(&log_dir);
            let file = fs::File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {}", log_file_path.display()))?;
            let (non_blocking, worker) = tracing_appender::non_blocking(file);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(layer)
                .try_init()
                .ok();

            tracing::info!(pruned, "Logging initialized. Log file: {}", log_file_path.display());
            Ok(LogGuard {
                path: Some(log_file_path),
                _worker: Some(worker),
            })
        }
    }
}

fn build_log_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| normalize_log_level(raw.as_str()))
        .unwrap_or(default_level);
    EnvFilter::new(format!("warn,daylist={level}"))
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    log_dir.join(format!("{}{}.log", LOG_FILE_PREFIX, timestamp))
}

/// Deletes all but the newest `keep` log files in `log_dir`
///
/// File names carry a sortable timestamp, so name order is age order.
/// Returns how many files were removed.
fn prune_old_logs(log_dir: &Path, keep: usize) -> io::Result<usize> {
    let mut logs: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(LOG_FILE_PREFIX) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();
    logs.sort_by(|a, b| b.cmp(a));

    let mut removed = 0;
    for old in logs.into_iter().skip(keep) {
        fs::remove_file(&old)?;
        removed += 1;
    }
    Ok(removed)
}

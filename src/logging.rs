//! Logging setup for the command line tools.
//!
//! Diagnostics always go to stderr; stdout is left to tool output. When the
//! application directory is writable each run also writes its own
//! `imgcurate_<timestamp>.log` under `logs/`, and only the newest
//! [`MAX_LOG_FILES`] of those are kept.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Run logs retained in the logs directory, including the current one.
pub const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "imgcurate_";
const LOG_FILE_EXTENSION: &str = "log";
const DEFAULT_FILTER: &str = "info";

const STEM_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that keep a run log from being written.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to open run log: {0}")]
    Appender(InitError),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Non-blocking writer for this run's log file.
struct RunLog {
    path: PathBuf,
    writer: NonBlocking,
    guard: WorkerGuard,
}

/// Install the global subscriber and return the run log path.
///
/// Stderr output is installed even when the run log cannot be opened; the
/// file error is then returned so the caller can report it.
pub fn init() -> Result<PathBuf, LoggingError> {
    let run_log = open_run_log(now_local_or_utc());
    let file_layer = run_log.as_ref().ok().map(|log| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_timer(build_timer())
            .with_writer(log.writer.clone())
    });
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_timer(build_timer())
        .with_writer(std::io::stderr);
    let subscriber = Registry::default()
        .with(build_env_filter())
        .with(stderr_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;

    let RunLog { path, guard, .. } = run_log?;
    let _ = LOG_GUARD.set(guard);
    tracing::debug!("Run log at {}", path.display());
    Ok(path)
}

fn open_run_log(now: OffsetDateTime) -> Result<RunLog, LoggingError> {
    let dir = app_dirs::logs_dir()?;
    prune_old_logs(&dir, MAX_LOG_FILES.saturating_sub(1))?;
    let stem = format_log_stem(now)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&stem)
        .filename_suffix(LOG_FILE_EXTENSION)
        .build(&dir)
        .map_err(LoggingError::Appender)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok(RunLog {
        path: dir.join(format!("{stem}.{LOG_FILE_EXTENSION}")),
        writer,
        guard,
    })
}

fn is_run_log(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX)
        && Path::new(name).extension().and_then(|ext| ext.to_str()) == Some(LOG_FILE_EXTENSION)
}

/// Delete the oldest run logs until at most `keep` remain.
///
/// Run log names embed their start time, so name order is age order. Other
/// files in the directory are left alone.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_run_log(name))
        .collect();
    names.sort_unstable();

    let excess = names.len().saturating_sub(keep);
    for name in &names[..excess] {
        let path = dir.join(name);
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn format_log_stem(now: OffsetDateTime) -> Result<String, LoggingError> {
    let stamp = now.format(STEM_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}{stamp}"))
}

fn build_timer() -> fmt::time::OffsetTime<&'static [BorrowedFormatItem<'static>]> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT)
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

//! Logging setup with a runtime-adjustable level.
//!
//! Logs go to stderr and, when a directory is given, to a daily rolling file.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::config::APP_DIR;
use crate::model::LogLevel;

const LOG_FILE_PREFIX: &str = "simple-aac.log";

static FILTER_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),

    #[error("Logging is already initialized")]
    AlreadyInitialized,
}

/// Local wall-clock timestamps with millisecond precision.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::new(level.as_str())
}

/// `<data dir>/simple-aac/logs`
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR).join("logs"))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for as long as logs should reach the file;
/// dropping it flushes and stops the background writer.
pub fn init(level: LogLevel, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, LoggingError> {
    let (filter, handle) = reload::Layer::new(filter_for(level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    FILTER_HANDLE
        .set(handle)
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(guard)
}

/// Change the active log level. No-op if [`init`] has not run.
pub fn set_verbosity(level: LogLevel) {
    if let Some(handle) = FILTER_HANDLE.get() {
        if let Err(e) = handle.reload(filter_for(level)) {
            warn!(error = %e, "Failed to change log level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_verbosity_never_panics() {
        set_verbosity(LogLevel::Trace);
    }

    #[test]
    fn init_installs_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let guard = init(LogLevel::Debug, Some(&dir.path().join("logs"))).unwrap();
        assert!(guard.is_some());
        assert!(dir.path().join("logs").is_dir());

        set_verbosity(LogLevel::Warn);
        assert!(init(LogLevel::Debug, None).is_err());
    }
}

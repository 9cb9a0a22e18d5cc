//! Log setup for the hook binary.
//!
//! Stdout belongs to Claude Code, so logs go to a daily-rotated file under
//! the log directory, or to stderr when that directory is unusable.

use std::path::Path;

use fs_err as fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use voicecue_core::config::{env_flag, DEBUG_LOG_ENV};

const LOG_FILE_PREFIX: &str = "voicecue-hook";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(log_dir: &Path, debug: bool) -> Option<WorkerGuard> {
    let filter = if debug || env_flag(DEBUG_LOG_ENV) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let appender = fs::create_dir_all(log_dir)
        .map_err(|err| err.to_string())
        .and_then(|()| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(MAX_LOG_FILES)
                .build(log_dir)
                .map_err(|err| err.to_string())
        });

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            tracing::warn!(
                error = %err,
                dir = %log_dir.display(),
                "Log directory unavailable, logging to stderr"
            );
            None
        }
    }
}

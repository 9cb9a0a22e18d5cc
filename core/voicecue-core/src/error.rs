//! Error types for voicecue-core operations.
//!
//! Resolution itself never fails; these errors only surface from catalog
//! loading, and callers are expected to degrade to the built-in catalog.

use std::path::PathBuf;
use std::time::Duration;

/// All errors that can occur while loading sound configuration.
#[derive(Debug, thiserror::Error)]
pub enum CueError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Sound mapping not found at {0}")]
    MappingNotFound(PathBuf),

    #[error("Sound mapping load timed out after {timeout:?}: {path}")]
    LoadTimedOut { path: PathBuf, timeout: Duration },

    #[error("Sound mapping loader exited without a result: {0}")]
    LoaderDisconnected(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using CueError.
pub type Result<T> = std::result::Result<T, CueError>;

impl From<CueError> for String {
    fn from(err: CueError) -> String {
        err.to_string()
    }
}

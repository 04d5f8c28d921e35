//! Error types for run state operations.

use std::path::PathBuf;

/// Errors that can occur while capturing or persisting run state.
///
/// Loading is fail-safe: a missing or corrupt state file yields a fresh,
/// non-incremental run rather than an error. These variants surface from
/// snapshotting and saving.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// An I/O error occurred while reading tracked files or writing state.
    #[error("state I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The run state could not be serialized.
    #[error("failed to serialize run state: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

//! Error types for schema extraction.

use std::path::PathBuf;

/// Fatal extraction failures.
///
/// Unsupported artifact types are not errors; they are skipped with a
/// warning. Everything here aborts the whole extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Reading an artifact or writing to the output directory failed.
    #[error("extraction I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The archive container could not be read.
    #[error("corrupt archive {path}: {reason}")]
    Archive {
        /// The archive path.
        path: PathBuf,
        /// What the container parser reported.
        reason: String,
    },

    /// An archive entry would be written outside the output directory.
    #[error("archive {path} contains unsafe entry '{entry}'")]
    UnsafeEntry {
        /// The archive path.
        path: PathBuf,
        /// The entry name as stored in the archive.
        entry: String,
    },
}

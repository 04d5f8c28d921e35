//! Error types for compiler invocation.

use std::path::PathBuf;

use quiver_extract::ExtractError;
use quiver_state::StateError;

/// Errors raised while running the schema compiler.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler process could not be started.
    #[error("failed to run schema compiler {executable}: {source}")]
    Spawn {
        /// The executable that failed to start.
        executable: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler exited with a non-zero status.
    #[error("schema compiler failed on {path} (exit code {code})")]
    Failed {
        /// The schema file being compiled.
        path: PathBuf,
        /// The process exit code.
        code: i32,
    },

    /// The compiler was killed by a signal before exiting.
    #[error("schema compiler terminated without an exit code on {path}")]
    Terminated {
        /// The schema file being compiled.
        path: PathBuf,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A directory could not be scanned or removed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Dependency extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Run state could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),
}

impl CompileError {
    /// The schema file the failure relates to, if any.
    pub fn schema_path(&self) -> Option<&PathBuf> {
        match self {
            CompileError::Failed { path, .. } | CompileError::Terminated { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_failed() {
        let err = CompileError::Failed {
            path: PathBuf::from("/p/src/main/thrift/B.thrift"),
            code: 1,
        };
        assert_eq!(
            err.to_string(),
            "schema compiler failed on /p/src/main/thrift/B.thrift (exit code 1)"
        );
        assert_eq!(
            err.schema_path(),
            Some(&PathBuf::from("/p/src/main/thrift/B.thrift"))
        );
    }

    #[test]
    fn display_spawn() {
        let err = CompileError::Spawn {
            executable: PathBuf::from("thrift"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("failed to run schema compiler thrift"));
        assert!(err.schema_path().is_none());
    }
}

//! Error types for configuration loading and validation.

use std::path::PathBuf;

use quiver_common::PatternError;

/// Errors that can occur when loading or validating a `quiver.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A referenced source set does not exist in the configuration.
    #[error("unknown source set '{0}'")]
    UnknownSourceSet(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A file pattern is not a valid glob.
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    /// An explicitly configured compiler path does not exist.
    #[error("schema compiler not found at {0}")]
    ExecutableNotFound(PathBuf),
}

//! Parsing and validation of `quiver.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], then resolves individual source sets into absolute paths,
//! ordered generator specs, and compiled schema patterns.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_source_set, ResolvedSourceSet};
pub use types::*;

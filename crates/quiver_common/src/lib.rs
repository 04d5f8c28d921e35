//! Shared foundational types used across the Quiver schema build driver.
//!
//! This crate provides content hashing for change detection, the per-path
//! change status vocabulary, generator specs, and schema file pattern matching.

#![warn(missing_docs)]

pub mod generator;
pub mod hash;
pub mod pattern;
pub mod status;

pub use generator::{generator_code, GeneratorSpec};
pub use hash::ContentHash;
pub use pattern::{collect_all_files, to_slash, PatternError, SchemaPattern, DEFAULT_SCHEMA_GLOB};
pub use status::ChangeStatus;

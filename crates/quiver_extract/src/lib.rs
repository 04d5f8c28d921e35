//! Dependency schema extraction.
//!
//! Pulls schema files out of dependency artifacts (directories, bare schema
//! files, zip/jar archives, tar archives with optional gzip or bzip2
//! compression) into a single flat staging directory. Later artifacts win when
//! two of them contribute the same relative path.

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod kind;

pub use error::ExtractError;
pub use extractor::{ExtractReport, Extractor};
pub use kind::{ArtifactKind, Compression};

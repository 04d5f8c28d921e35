//! Artifact classification by filesystem type and file name.

use std::path::Path;

use quiver_common::SchemaPattern;

/// Compression layer wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    /// Plain `.tar`.
    None,
    /// `.tar.gz` or `.tgz`.
    Gzip,
    /// `.tar.bz2`.
    Bzip2,
}

/// What a dependency artifact is and therefore how to read it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A directory scanned recursively.
    Directory,
    /// A single schema file copied verbatim.
    SchemaFile,
    /// A `.zip` or `.jar` container.
    Zip,
    /// A tar container with the given compression.
    Tar(Compression),
    /// Anything else; skipped.
    Unsupported,
}

impl ArtifactKind {
    /// Classifies an artifact path.
    ///
    /// Directories are detected on disk; everything else goes by name, so a
    /// missing `.zip` still classifies as `Zip` and fails when opened.
    pub fn classify(path: &Path, pattern: &SchemaPattern) -> Self {
        if path.is_dir() {
            return ArtifactKind::Directory;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return ArtifactKind::Unsupported,
        };
        if pattern.matches_file_name(name) {
            return ArtifactKind::SchemaFile;
        }
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".jar") || lower.ends_with(".zip") {
            ArtifactKind::Zip
        } else if lower.ends_with(".tar") {
            ArtifactKind::Tar(Compression::None)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            ArtifactKind::Tar(Compression::Gzip)
        } else if lower.ends_with(".tar.bz2") {
            ArtifactKind::Tar(Compression::Bzip2)
        } else {
            ArtifactKind::Unsupported
        }
    }
}

//! Extraction of schema files from dependency artifacts.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use quiver_common::SchemaPattern;

use crate::error::ExtractError;
use crate::kind::{ArtifactKind, Compression};

/// What an extraction pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Output files written, relative to the output directory.
    pub files: BTreeSet<PathBuf>,
    /// Artifacts skipped because their type is unsupported, one warning each.
    pub skipped: Vec<PathBuf>,
}

/// Copies schema files matching a pattern out of dependency artifacts.
///
/// The extractor owns its output directory for the duration of a pass but
/// never deletes from it; callers prune stale content beforehand.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    pattern: SchemaPattern,
}

impl Extractor {
    /// Creates an extractor selecting files that match `pattern`.
    pub fn new(pattern: SchemaPattern) -> Self {
        Self { pattern }
    }

    /// Extracts every artifact in order into `output_dir`.
    ///
    /// Unsupported artifacts are skipped with a warning. Corrupt archives and
    /// I/O failures abort the pass.
    pub fn extract(
        &self,
        artifacts: &[PathBuf],
        output_dir: &Path,
    ) -> Result<ExtractReport, ExtractError> {
        std::fs::create_dir_all(output_dir).map_err(|e| io_err(output_dir, e))?;

        let mut report = ExtractReport::default();
        for artifact in artifacts {
            let kind = ArtifactKind::classify(artifact, &self.pattern);
            tracing::debug!(
                "extracting schemas from {} ({kind:?}) to {}",
                artifact.display(),
                output_dir.display()
            );
            match kind {
                ArtifactKind::Directory => self.extract_dir(artifact, output_dir, &mut report)?,
                ArtifactKind::SchemaFile => copy_schema(artifact, output_dir, &mut report)?,
                ArtifactKind::Zip => self.extract_zip(artifact, output_dir, &mut report)?,
                ArtifactKind::Tar(compression) => {
                    self.extract_tar(artifact, compression, output_dir, &mut report)?
                }
                ArtifactKind::Unsupported => {
                    tracing::warn!(
                        "skipping unsupported artifact '{}'; handles only directories, schema \
                         files, zip, jar, tar, tar.gz, tgz & tar.bz2",
                        artifact.display()
                    );
                    report.skipped.push(artifact.clone());
                }
            }
        }
        Ok(report)
    }

    fn extract_dir(
        &self,
        dir: &Path,
        output_dir: &Path,
        report: &mut ExtractReport,
    ) -> Result<(), ExtractError> {
        let files = self.pattern.collect(dir).map_err(|e| io_err(dir, e))?;
        for file in files {
            let rel = match file.strip_prefix(dir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            let dest = output_dir.join(&rel);
            ensure_parent(&dest)?;
            std::fs::copy(&file, &dest).map_err(|e| io_err(&file, e))?;
            report.files.insert(rel);
        }
        Ok(())
    }

    fn extract_zip(
        &self,
        path: &Path,
        output_dir: &Path,
        report: &mut ExtractReport,
    ) -> Result<(), ExtractError> {
        let file = File::open(path).map_err(|e| io_err(path, e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_err(path, e))?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| archive_err(path, e))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            if !self.pattern.matches_str(&name) {
                continue;
            }
            let rel = safe_relative(Path::new(&name)).ok_or_else(|| ExtractError::UnsafeEntry {
                path: path.to_path_buf(),
                entry: name.clone(),
            })?;
            write_entry(&mut entry, path, &output_dir.join(&rel))?;
            report.files.insert(rel);
        }
        Ok(())
    }

    fn extract_tar(
        &self,
        path: &Path,
        compression: Compression,
        output_dir: &Path,
        report: &mut ExtractReport,
    ) -> Result<(), ExtractError> {
        let file = File::open(path).map_err(|e| io_err(path, e))?;
        let reader: Box<dyn Read> = match compression {
            Compression::None => Box::new(file),
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(file)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(file)),
        };
        let mut archive = tar::Archive::new(reader);
        let entries = archive.entries().map_err(|e| archive_err(path, e))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| archive_err(path, e))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let entry_path = entry
                .path()
                .map_err(|e| archive_err(path, e))?
                .into_owned();
            let name = entry_path.to_string_lossy().into_owned();
            if !self.pattern.matches_str(&name) {
                continue;
            }
            let rel = safe_relative(&entry_path).ok_or_else(|| ExtractError::UnsafeEntry {
                path: path.to_path_buf(),
                entry: name.clone(),
            })?;
            write_entry(&mut entry, path, &output_dir.join(&rel))?;
            report.files.insert(rel);
        }
        Ok(())
    }
}

fn copy_schema(
    file: &Path,
    output_dir: &Path,
    report: &mut ExtractReport,
) -> Result<(), ExtractError> {
    let name = match file.file_name() {
        Some(name) => PathBuf::from(name),
        None => return Ok(()),
    };
    std::fs::copy(file, output_dir.join(&name)).map_err(|e| io_err(file, e))?;
    report.files.insert(name);
    Ok(())
}

/// Strips `.` components and rejects anything that could escape the root.
fn safe_relative(path: &Path) -> Option<PathBuf> {
    let mut rel = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if rel.as_os_str().is_empty() {
        None
    } else {
        Some(rel)
    }
}

/// Streams one archive entry to `dest`.
///
/// Read failures mean the archive body is damaged and are reported against
/// `archive`; create and write failures are reported against `dest`.
fn write_entry(reader: &mut dyn Read, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    ensure_parent(dest)?;
    let mut out = File::create(dest).map_err(|e| io_err(dest, e))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(archive_err(archive, e)),
        };
        out.write_all(&buf[..n]).map_err(|e| io_err(dest, e))?;
    }
    Ok(())
}

fn ensure_parent(dest: &Path) -> Result<(), ExtractError> {
    match dest.parent() {
        Some(parent) => std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e)),
        None => Ok(()),
    }
}

fn io_err(path: &Path, source: io::Error) -> ExtractError {
    ExtractError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn archive_err(path: &Path, reason: impl std::fmt::Display) -> ExtractError {
    ExtractError::Archive {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

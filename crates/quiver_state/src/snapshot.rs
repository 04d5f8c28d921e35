//! Point-in-time file fingerprints and drift classification.
//!
//! A [`Snapshot`] maps each tracked path to the content hash it had when the
//! snapshot was taken. [`detect_changes`] is a pure function of two snapshots.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quiver_common::{collect_all_files, ChangeStatus, ContentHash};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Content fingerprints of a set of files, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    files: BTreeMap<PathBuf, ContentHash>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the content hash of a single file.
    pub fn hash_file(path: &Path) -> Result<ContentHash, StateError> {
        let content = std::fs::read(path).map_err(|e| StateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Fingerprints each of the given files.
    ///
    /// Files that cannot be read are left out, so they show up as removed
    /// when compared with an earlier snapshot.
    pub fn capture_files(paths: &[PathBuf]) -> Self {
        let mut files = BTreeMap::new();
        for path in paths {
            match Self::hash_file(path) {
                Ok(hash) => {
                    files.insert(path.clone(), hash);
                }
                Err(e) => tracing::debug!("not tracking unreadable file: {e}"),
            }
        }
        Self { files }
    }

    /// Fingerprints every regular file beneath each directory.
    ///
    /// The entity tracked for an include directory is its file membership and
    /// the content of those files; a missing directory contributes nothing.
    pub fn capture_dirs(dirs: &[PathBuf]) -> Result<Self, StateError> {
        let mut paths = Vec::new();
        for dir in dirs {
            let found = collect_all_files(dir).map_err(|e| StateError::Io {
                path: dir.clone(),
                source: e,
            })?;
            paths.extend(found);
        }
        Ok(Self::capture_files(&paths))
    }

    /// Records a fingerprint for a path.
    pub fn insert(&mut self, path: PathBuf, hash: ContentHash) {
        self.files.insert(path, hash);
    }

    /// Returns `true` if the path is tracked.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates tracked paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }
}

/// Result of comparing a current snapshot against the previous one.
///
/// Every path of either snapshot lands in exactly one bucket. Buckets are
/// sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Paths absent from the previous snapshot.
    pub added: Vec<PathBuf>,

    /// Paths whose content hash differs from the previous snapshot.
    pub modified: Vec<PathBuf>,

    /// Paths in the previous snapshot but not in the current one.
    pub removed: Vec<PathBuf>,

    /// Paths whose content hash matches.
    pub unchanged: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if there are no added, modified, or removed paths.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Iterates every added, modified or removed path with its status.
    pub fn changes(&self) -> impl Iterator<Item = (&Path, ChangeStatus)> {
        tagged(&self.added, ChangeStatus::Added)
            .chain(tagged(&self.modified, ChangeStatus::Modified))
            .chain(tagged(&self.removed, ChangeStatus::Removed))
    }

    /// Looks up the status of a path, if either snapshot tracked it.
    pub fn status_of(&self, path: &Path) -> Option<ChangeStatus> {
        let has = |paths: &[PathBuf]| paths.iter().any(|p| p == path);
        if has(&self.added) {
            Some(ChangeStatus::Added)
        } else if has(&self.modified) {
            Some(ChangeStatus::Modified)
        } else if has(&self.removed) {
            Some(ChangeStatus::Removed)
        } else if has(&self.unchanged) {
            Some(ChangeStatus::Unchanged)
        } else {
            None
        }
    }

    /// Builds a change set in which every current path counts as added.
    ///
    /// Used when no previous snapshot is available.
    pub fn all_added(current: &Snapshot) -> Self {
        Self {
            added: current.paths().cloned().collect(),
            ..Self::default()
        }
    }
}

fn tagged(
    paths: &[PathBuf],
    status: ChangeStatus,
) -> impl Iterator<Item = (&Path, ChangeStatus)> + '_ {
    paths.iter().map(move |p| (p.as_path(), status))
}

/// Classifies every path of `current` and `previous`.
pub fn detect_changes(current: &Snapshot, previous: &Snapshot) -> ChangeSet {
    let mut set = ChangeSet::default();

    for (path, hash) in &current.files {
        match previous.files.get(path) {
            Some(prev) if prev == hash => set.unchanged.push(path.clone()),
            Some(_) => set.modified.push(path.clone()),
            None => set.added.push(path.clone()),
        }
    }

    set.removed = previous
        .files
        .keys()
        .filter(|p| !current.files.contains_key(*p))
        .cloned()
        .collect();

    set
}

//! Incremental selection of the schema files to compile.
//!
//! The compiler resolves includes itself and we never parse schemas, so any
//! change we cannot attribute to a single input falls back to compiling the
//! whole pool. Under-compiling is never acceptable; over-compiling is.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use quiver_common::ChangeStatus;
use quiver_state::ChangeSet;

/// Why a selection contains what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionReason {
    /// No usable previous run; the whole pool is compiled.
    NotIncremental,
    /// A file under an include directory was modified or removed.
    IncludeChanged(PathBuf, ChangeStatus),
    /// An input schema file was removed.
    InputRemoved(PathBuf),
    /// Only added and modified inputs are compiled.
    Incremental,
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::NotIncremental => f.write_str("full build"),
            SelectionReason::IncludeChanged(path, status) => {
                write!(f, "include {} was {status}", path.display())
            }
            SelectionReason::InputRemoved(path) => {
                write!(f, "input {} was removed", path.display())
            }
            SelectionReason::Incremental => f.write_str("incremental"),
        }
    }
}

/// The files chosen for compilation, sorted, with the rule that chose them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Schema files to compile, sorted by path.
    pub files: Vec<PathBuf>,
    /// The rule that produced `files`.
    pub reason: SelectionReason,
}

impl Selection {
    /// Returns `true` if every candidate was selected.
    pub fn is_full(&self) -> bool {
        !matches!(self.reason, SelectionReason::Incremental)
    }
}

/// Decides which input files must be sent to the compiler.
///
/// Rules are applied in order and the first one that matches wins:
///
/// 1. a non-incremental run compiles the full pool;
/// 2. any include change other than an addition compiles the full pool;
/// 3. any removed input compiles the full pool;
/// 4. otherwise only added and modified inputs are compiled.
///
/// Include changes on paths that also appear in `input_changes` are ignored
/// for rule 2, since the input rules already account for them. Paths are
/// returned even if they have since been deleted; the runner skips those.
pub fn select_files_to_compile(
    input_changes: &ChangeSet,
    include_changes: &ChangeSet,
    all_input_files: &[PathBuf],
    is_incremental: bool,
) -> Selection {
    if !is_incremental {
        return full_pool(all_input_files, SelectionReason::NotIncremental);
    }

    let input_paths: BTreeSet<&Path> = input_changes.changes().map(|(p, _)| p).collect();
    let include_edit = include_changes
        .changes()
        .filter(|(path, _)| !input_paths.contains(path))
        .find(|(_, status)| *status != ChangeStatus::Added);
    if let Some((path, status)) = include_edit {
        tracing::debug!("include {} {status}; compiling every input", path.display());
        return full_pool(
            all_input_files,
            SelectionReason::IncludeChanged(path.to_path_buf(), status),
        );
    }

    if let Some(removed) = input_changes.removed.first() {
        tracing::debug!("input {} removed; compiling every input", removed.display());
        return full_pool(
            all_input_files,
            SelectionReason::InputRemoved(removed.clone()),
        );
    }

    let files: BTreeSet<PathBuf> = input_changes
        .changes()
        .filter(|(_, status)| status.needs_compile())
        .map(|(path, _)| path.to_path_buf())
        .collect();
    tracing::debug!("{} changed input(s) selected", files.len());
    Selection {
        files: files.into_iter().collect(),
        reason: SelectionReason::Incremental,
    }
}

fn full_pool(all_input_files: &[PathBuf], reason: SelectionReason) -> Selection {
    let files: BTreeSet<PathBuf> = all_input_files.iter().cloned().collect();
    Selection {
        files: files.into_iter().collect(),
        reason,
    }
}

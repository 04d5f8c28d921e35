//! The persisted record of the last successful run.
//!
//! Stored as `state.json` in the state directory. It records content hashes for
//! every input schema file and every file beneath the include directories,
//! plus a fingerprint of the compile configuration.

use std::path::Path;

use quiver_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::snapshot::Snapshot;

/// Name of the state file within the state directory.
const STATE_FILE: &str = "state.json";

/// Current on-disk format version. Bump on incompatible layout changes.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Snapshot of a successful run, compared against the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// On-disk format version.
    pub format_version: u32,

    /// Quiver version that wrote this state.
    pub tool_version: String,

    /// Hash of everything that shapes the compiler command line.
    pub config_fingerprint: ContentHash,

    /// Fingerprints of the input schema files.
    pub inputs: Snapshot,

    /// Fingerprints of every file beneath the include directories.
    pub includes: Snapshot,
}

impl RunState {
    /// Creates a state record with empty snapshots.
    pub fn new(tool_version: &str, config_fingerprint: ContentHash) -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION,
            tool_version: tool_version.to_string(),
            config_fingerprint,
            inputs: Snapshot::new(),
            includes: Snapshot::new(),
        }
    }

    /// Loads the state from the state directory, returning `None` if the
    /// file doesn't exist or can't be parsed.
    ///
    /// Any failure means the next run is non-incremental.
    pub fn load(state_dir: &Path) -> Option<Self> {
        let path = state_dir.join(STATE_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!("ignoring unreadable run state {}: {e}", path.display());
                None
            }
        }
    }

    /// Writes the state to the state directory, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<(), StateError> {
        std::fs::create_dir_all(state_dir).map_err(|e| StateError::Io {
            path: state_dir.to_path_buf(),
            source: e,
        })?;
        let path = state_dir.join(STATE_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| StateError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| StateError::Io { path, source: e })
    }

    /// Deletes the state file if present.
    pub fn clear(state_dir: &Path) -> Result<(), StateError> {
        let path = state_dir.join(STATE_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::Io { path, source: e }),
        }
    }

    /// Returns `true` if this record was written by a compatible version.
    pub fn is_compatible(&self, tool_version: &str) -> bool {
        self.format_version == STATE_FORMAT_VERSION && self.tool_version == tool_version
    }
}

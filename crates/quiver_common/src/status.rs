//! Per-path change status between two runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a tracked path differs from the previous successful run.
///
/// Exactly one status applies to a path within a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// The path was not tracked by the previous run.
    Added,
    /// The path was tracked before and its content fingerprint changed.
    Modified,
    /// The path was tracked before and is no longer present.
    Removed,
    /// The path was tracked before with the same fingerprint.
    Unchanged,
}

impl ChangeStatus {
    /// Returns `true` for `Added` and `Modified`.
    pub fn needs_compile(self) -> bool {
        matches!(self, ChangeStatus::Added | ChangeStatus::Modified)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeStatus::Added => "added",
            ChangeStatus::Modified => "modified",
            ChangeStatus::Removed => "removed",
            ChangeStatus::Unchanged => "unchanged",
        };
        f.pad(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_compile() {
        assert!(ChangeStatus::Added.needs_compile());
        assert!(ChangeStatus::Modified.needs_compile());
        assert!(!ChangeStatus::Removed.needs_compile());
        assert!(!ChangeStatus::Unchanged.needs_compile());
    }

    #[test]
    fn display_lowercase() {
        assert_eq!(ChangeStatus::Added.to_string(), "added");
        assert_eq!(ChangeStatus::Removed.to_string(), "removed");
        assert_eq!(format!("{:>9}", ChangeStatus::Added), "    added");
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&ChangeStatus::Modified).unwrap();
        assert_eq!(json, "\"modified\"");
    }
}

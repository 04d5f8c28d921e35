//! Run state persistence and change detection for incremental builds.
//!
//! A [`RunState`] records content fingerprints of every tracked input file and
//! every file beneath the include directories as of the last successful run.
//! [`Tracker`] compares that record with the filesystem and produces a
//! [`ChangeReport`] for the selection engine; the new snapshot is only written
//! back once the caller commits a successful run.

#![warn(missing_docs)]

pub mod error;
pub mod snapshot;
pub mod state;
pub mod tracker;

pub use error::StateError;
pub use snapshot::{detect_changes, ChangeSet, Snapshot};
pub use state::{RunState, STATE_FORMAT_VERSION};
pub use tracker::{ChangeReport, Observation, RebuildReason, TrackedInputs, Tracker};

//! High-level run state orchestrator.
//!
//! The `Tracker` ties the persisted [`RunState`] and snapshotting together for
//! the build pipeline: load the previous record, observe the filesystem,
//! produce a [`ChangeReport`], and commit the new record after success.

use std::fmt;
use std::path::{Path, PathBuf};

use quiver_common::ContentHash;

use crate::error::StateError;
use crate::snapshot::{detect_changes, ChangeSet, Snapshot};
use crate::state::RunState;

/// What the tracker needs to know about the current run.
#[derive(Debug, Clone, Copy)]
pub struct TrackedInputs<'a> {
    /// Candidate schema files for compilation.
    pub input_files: &'a [PathBuf],
    /// Include search roots whose file membership is tracked.
    pub include_dirs: &'a [PathBuf],
    /// Hash of the compile configuration.
    pub config_fingerprint: ContentHash,
    /// Root of the generated output tree.
    pub output_dir: &'a Path,
}

/// Why a run cannot use incremental information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    /// No compatible state from a previous successful run.
    NoPreviousState,
    /// Executable, options, generators, or paths changed.
    ConfigurationChanged,
    /// The generated output directory no longer exists.
    OutputMissing,
    /// The caller asked for a full rebuild.
    Forced,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RebuildReason::NoPreviousState => "no previous run state",
            RebuildReason::ConfigurationChanged => "compile configuration changed",
            RebuildReason::OutputMissing => "output directory is missing",
            RebuildReason::Forced => "full rebuild requested",
        };
        f.write_str(s)
    }
}

/// Per-path change statuses for the input pool and the include pool.
#[derive(Debug, Clone)]
pub struct ChangeReport {
    /// Set when incremental information is unusable.
    pub rebuild_reason: Option<RebuildReason>,
    /// Changes among the input schema files.
    pub inputs: ChangeSet,
    /// Changes among files beneath the include directories.
    pub includes: ChangeSet,
}

impl ChangeReport {
    /// Returns `true` if statuses are relative to a usable previous run.
    pub fn is_incremental(&self) -> bool {
        self.rebuild_reason.is_none()
    }
}

/// A change report together with the state to commit if the run succeeds.
#[derive(Debug, Clone)]
pub struct Observation {
    /// The change report for this run.
    pub report: ChangeReport,
    /// The record describing the filesystem as observed.
    pub next: RunState,
}

/// Loads, compares, and commits run state for one source set.
pub struct Tracker {
    /// Directory holding `state.json`.
    state_dir: PathBuf,

    /// The compatible previous record, if any.
    previous: Option<RunState>,

    /// Quiver version string for compatibility checks.
    tool_version: String,

    /// Ignore the previous record when classifying.
    forced: bool,
}

impl Tracker {
    /// Loads the previous run state, or starts without one.
    ///
    /// An incompatible or unreadable record is treated as absent.
    pub fn load_or_create(state_dir: &Path, tool_version: &str) -> Self {
        let previous = RunState::load(state_dir).filter(|s| s.is_compatible(tool_version));
        Self {
            state_dir: state_dir.to_path_buf(),
            previous,
            tool_version: tool_version.to_string(),
            forced: false,
        }
    }

    /// Marks the next observation as non-incremental regardless of state.
    pub fn force_full(&mut self) {
        self.forced = true;
    }

    /// Snapshots the filesystem and classifies it against the previous run.
    pub fn observe(&self, tracked: &TrackedInputs<'_>) -> Result<Observation, StateError> {
        let inputs = Snapshot::capture_files(tracked.input_files);
        let includes = Snapshot::capture_dirs(tracked.include_dirs)?;

        let (input_changes, include_changes) = match &self.previous {
            Some(prev) => (
                detect_changes(&inputs, &prev.inputs),
                detect_changes(&includes, &prev.includes),
            ),
            None => (ChangeSet::all_added(&inputs), ChangeSet::all_added(&includes)),
        };

        let rebuild_reason = self.rebuild_reason(tracked);
        match rebuild_reason {
            Some(reason) => tracing::debug!("non-incremental run: {reason}"),
            None => tracing::debug!(
                "incremental run: {} input change(s), {} include change(s)",
                input_changes.changes().count(),
                include_changes.changes().count()
            ),
        }

        let next = RunState {
            inputs,
            includes,
            ..RunState::new(&self.tool_version, tracked.config_fingerprint)
        };

        Ok(Observation {
            report: ChangeReport {
                rebuild_reason,
                inputs: input_changes,
                includes: include_changes,
            },
            next,
        })
    }

    fn rebuild_reason(&self, tracked: &TrackedInputs<'_>) -> Option<RebuildReason> {
        if self.forced {
            return Some(RebuildReason::Forced);
        }
        let prev = match &self.previous {
            Some(prev) => prev,
            None => return Some(RebuildReason::NoPreviousState),
        };
        if prev.config_fingerprint != tracked.config_fingerprint {
            return Some(RebuildReason::ConfigurationChanged);
        }
        if !tracked.output_dir.is_dir() {
            return Some(RebuildReason::OutputMissing);
        }
        None
    }

    /// Persists `next` as the new previous state.
    ///
    /// Call only after the run succeeded; a failed run leaves the old record
    /// in place so unfinished files are reconsidered.
    pub fn commit(&mut self, next: RunState) -> Result<(), StateError> {
        next.save(&self.state_dir)?;
        self.previous = Some(next);
        self.forced = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        state_dir: PathBuf,
        src: PathBuf,
        include: PathBuf,
        out: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let include = dir.path().join("include");
        let out = dir.path().join("out");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&include).unwrap();
        std::fs::create_dir_all(&out).unwrap();
        Fixture {
            state_dir: dir.path().join(".quiver"),
            src,
            include,
            out,
            _dir: dir,
        }
    }

    fn config() -> ContentHash {
        ContentHash::from_parts(["thrift", "--gen", "java"])
    }

    fn observe(tracker: &Tracker, fx: &Fixture, inputs: &[PathBuf]) -> Observation {
        let includes = vec![fx.include.clone()];
        tracker
            .observe(&TrackedInputs {
                input_files: inputs,
                include_dirs: &includes,
                config_fingerprint: config(),
                output_dir: &fx.out,
            })
            .unwrap()
    }

    #[test]
    fn first_run_is_not_incremental() {
        let fx = fixture();
        let a = fx.src.join("a.thrift");
        std::fs::write(&a, "struct A {}").unwrap();

        let tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[a]);
        assert!(!obs.report.is_incremental());
        assert_eq!(obs.report.rebuild_reason, Some(RebuildReason::NoPreviousState));
        assert_eq!(obs.report.inputs.added.len(), 1);
    }

    #[test]
    fn commit_then_unchanged() {
        let fx = fixture();
        let a = fx.src.join("a.thrift");
        std::fs::write(&a, "struct A {}").unwrap();
        std::fs::write(fx.include.join("shared.thrift"), "struct S {}").unwrap();

        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, std::slice::from_ref(&a));
        tracker.commit(obs.next).unwrap();

        let tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[a]);
        assert!(obs.report.is_incremental());
        assert!(obs.report.inputs.is_empty());
        assert!(obs.report.includes.is_empty());
    }

    #[test]
    fn include_edit_is_modified() {
        let fx = fixture();
        let shared = fx.include.join("shared.thrift");
        std::fs::write(&shared, "struct S {}").unwrap();

        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[]);
        tracker.commit(obs.next).unwrap();

        std::fs::write(&shared, "struct S { 1: i32 x }").unwrap();
        std::fs::write(fx.include.join("extra.thrift"), "struct E {}").unwrap();
        let obs = observe(&tracker, &fx, &[]);
        assert_eq!(obs.report.includes.modified, vec![shared]);
        assert_eq!(obs.report.includes.added.len(), 1);
    }

    #[test]
    fn config_change_forces_full() {
        let fx = fixture();
        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[]);
        tracker.commit(obs.next).unwrap();

        let obs = tracker
            .observe(&TrackedInputs {
                input_files: &[],
                include_dirs: &[],
                config_fingerprint: ContentHash::from_parts(["thrift", "--gen", "py"]),
                output_dir: &fx.out,
            })
            .unwrap();
        assert_eq!(
            obs.report.rebuild_reason,
            Some(RebuildReason::ConfigurationChanged)
        );
    }

    #[test]
    fn missing_output_forces_full() {
        let fx = fixture();
        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[]);
        tracker.commit(obs.next).unwrap();

        std::fs::remove_dir_all(&fx.out).unwrap();
        let obs = observe(&tracker, &fx, &[]);
        assert_eq!(obs.report.rebuild_reason, Some(RebuildReason::OutputMissing));
    }

    #[test]
    fn version_mismatch_starts_fresh() {
        let fx = fixture();
        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[]);
        tracker.commit(obs.next).unwrap();

        let tracker = Tracker::load_or_create(&fx.state_dir, "0.2.0");
        let obs = observe(&tracker, &fx, &[]);
        assert_eq!(obs.report.rebuild_reason, Some(RebuildReason::NoPreviousState));
    }

    #[test]
    fn force_ignores_previous_state() {
        let fx = fixture();
        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[]);
        tracker.commit(obs.next).unwrap();

        tracker.force_full();
        let obs = observe(&tracker, &fx, &[]);
        assert_eq!(obs.report.rebuild_reason, Some(RebuildReason::Forced));
    }

    #[test]
    fn uncommitted_run_keeps_old_state() {
        let fx = fixture();
        let a = fx.src.join("a.thrift");
        std::fs::write(&a, "struct A {}").unwrap();

        let mut tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, std::slice::from_ref(&a));
        tracker.commit(obs.next).unwrap();

        std::fs::write(&a, "struct A2 {}").unwrap();
        // observed but never committed, as after a failed compile
        let _ = observe(&tracker, &fx, std::slice::from_ref(&a));

        let tracker = Tracker::load_or_create(&fx.state_dir, "0.1.0");
        let obs = observe(&tracker, &fx, &[a.clone()]);
        assert_eq!(obs.report.inputs.modified, vec![a]);
    }
}

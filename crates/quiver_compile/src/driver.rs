//! End-to-end build of one source set.
//!
//! A build stages dependency schemas, collects the candidate pool, compares it
//! with the previous run, compiles the selection and, only if every invocation
//! succeeded, records the new run state.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use quiver_config::ResolvedSourceSet;
use quiver_extract::{ExtractReport, Extractor};
use quiver_state::{Observation, RunState, TrackedInputs, Tracker};

use crate::command::{CompileCommand, OutputLayout};
use crate::error::CompileError;
use crate::runner::{CompileSummary, Runner};
use crate::select::{select_files_to_compile, Selection};

/// Version recorded in run state; state from another version is discarded.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything known about a source set before the compiler runs.
#[derive(Debug, Clone)]
pub struct Plan {
    /// What extraction staged.
    pub extracted: ExtractReport,
    /// The full candidate pool, sorted.
    pub input_files: Vec<PathBuf>,
    /// Change report and the state to commit on success.
    pub observation: Observation,
    /// The files to compile.
    pub selection: Selection,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The plan that was executed.
    pub plan: Plan,
    /// Per-file compiler outcomes.
    pub summary: CompileSummary,
}

/// Drives extraction, selection, compilation and state for a source set.
#[derive(Debug)]
pub struct Driver<'a> {
    set: &'a ResolvedSourceSet,
}

impl<'a> Driver<'a> {
    /// Creates a driver for a resolved source set.
    pub fn new(set: &'a ResolvedSourceSet) -> Self {
        Self { set }
    }

    /// The invocation template for this source set.
    pub fn command(&self) -> CompileCommand {
        CompileCommand::new(&self.set.executable, &self.set.output_dir)
            .executable_options(self.set.executable_options.iter().cloned())
            .generators(self.set.generators.iter().cloned())
            .layout(OutputLayout::from_nested(self.set.nested_output))
            .include_dirs(self.set.include_dirs())
    }

    /// Clears the extract directory and re-extracts every dependency.
    pub fn extract(&self) -> Result<ExtractReport, CompileError> {
        remove_dir(&self.set.extract_dir)?;
        let extractor = Extractor::new(self.set.schema_pattern.clone());
        Ok(extractor.extract(&self.set.dependencies, &self.set.extract_dir)?)
    }

    /// Collects compile candidates from the sources and the extract directory.
    pub fn input_files(&self) -> Result<Vec<PathBuf>, CompileError> {
        let mut files = BTreeSet::new();
        for root in self.set.input_roots() {
            let found = self
                .set
                .compile_pattern
                .collect(&root)
                .map_err(|source| CompileError::Io {
                    path: root.clone(),
                    source,
                })?;
            files.extend(found);
        }
        Ok(files.into_iter().collect())
    }

    /// Extracts, observes and selects without compiling or saving state.
    pub fn plan(&self, force: bool) -> Result<Plan, CompileError> {
        let mut tracker = Tracker::load_or_create(&self.set.state_dir, TOOL_VERSION);
        if force {
            tracker.force_full();
        }
        self.plan_with(&tracker)
    }

    fn plan_with(&self, tracker: &Tracker) -> Result<Plan, CompileError> {
        let extracted = self.extract()?;
        let input_files = self.input_files()?;
        let include_dirs = self.set.include_dirs();

        let observation = tracker.observe(&TrackedInputs {
            input_files: &input_files,
            include_dirs: &include_dirs,
            config_fingerprint: self.set.fingerprint(),
            output_dir: &self.set.output_dir,
        })?;

        let report = &observation.report;
        let selection = select_files_to_compile(
            &report.inputs,
            &report.includes,
            &input_files,
            report.is_incremental(),
        );

        Ok(Plan {
            extracted,
            input_files,
            observation,
            selection,
        })
    }

    /// Runs a full build. Run state is saved only when every file compiled.
    pub fn build(&self, jobs: usize, force: bool) -> Result<BuildOutcome, CompileError> {
        let mut tracker = Tracker::load_or_create(&self.set.state_dir, TOOL_VERSION);
        if force {
            tracker.force_full();
        }
        let plan = self.plan_with(&tracker)?;

        let runner = Runner::new(self.command());
        let summary = runner.compile_all(&plan.selection.files, jobs)?;

        tracker.commit(plan.observation.next.clone())?;
        Ok(BuildOutcome { plan, summary })
    }

    /// Removes the extract, output and state directories.
    pub fn clean(&self) -> Result<(), CompileError> {
        remove_dir(&self.set.extract_dir)?;
        remove_dir(&self.set.output_dir)?;
        RunState::clear(&self.set.state_dir)?;
        remove_dir(&self.set.state_dir)
    }
}

fn remove_dir(dir: &Path) -> Result<(), CompileError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CompileError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

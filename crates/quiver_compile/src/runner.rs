//! Execution of compiler invocations, one process per schema file.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::command::CompileCommand;
use crate::error::CompileError;

/// Outcome counts of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Files the compiler processed.
    pub compiled: Vec<PathBuf>,
    /// Selected files that no longer existed.
    pub skipped: Vec<PathBuf>,
}

/// Runs the compiler for each selected file.
///
/// Invocations block with no timeout; a hung compiler blocks the run.
#[derive(Debug, Clone)]
pub struct Runner {
    command: CompileCommand,
}

enum FileOutcome {
    Compiled,
    Skipped,
}

impl Runner {
    /// Creates a runner for a fully configured command.
    pub fn new(command: CompileCommand) -> Self {
        Self { command }
    }

    /// Compiles one file.
    ///
    /// A missing file is skipped with a warning and counts as success.
    pub fn compile(&self, file: &Path) -> Result<bool, CompileError> {
        self.compile_one(file)
            .map(|outcome| matches!(outcome, FileOutcome::Compiled))
    }

    /// Compiles `files` in order, stopping at the first failure.
    ///
    /// With `jobs > 1` the files are compiled on a thread pool of that size;
    /// every file is attempted and the failure of the lowest path is reported.
    pub fn compile_all(
        &self,
        files: &[PathBuf],
        jobs: usize,
    ) -> Result<CompileSummary, CompileError> {
        let output_dir = self.command.output_dir();
        std::fs::create_dir_all(output_dir).map_err(|source| CompileError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        if jobs > 1 && files.len() > 1 {
            return self.compile_parallel(files, jobs);
        }

        let mut summary = CompileSummary::default();
        for file in files {
            let outcome = self.compile_one(file)?;
            summary.record(file, outcome);
        }
        Ok(summary)
    }

    fn compile_parallel(
        &self,
        files: &[PathBuf],
        jobs: usize,
    ) -> Result<CompileSummary, CompileError> {
        let mut ordered = files.to_vec();
        ordered.sort();

        let run = |files: &[PathBuf]| -> Vec<Result<FileOutcome, CompileError>> {
            files.par_iter().map(|f| self.compile_one(f)).collect()
        };
        let results = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| run(&ordered)),
            Err(e) => {
                tracing::warn!("failed to create thread pool ({e}), compiling sequentially");
                ordered.iter().map(|f| self.compile_one(f)).collect()
            }
        };

        let mut summary = CompileSummary::default();
        for (file, result) in ordered.iter().zip(results) {
            summary.record(file, result?);
        }
        Ok(summary)
    }

    fn compile_one(&self, file: &Path) -> Result<FileOutcome, CompileError> {
        if !file.is_file() {
            tracing::warn!("skipping {}: file no longer exists", file.display());
            return Ok(FileOutcome::Skipped);
        }

        tracing::info!("compiling {}", file.display());
        tracing::debug!("{}", self.command.render(file));

        let status = self
            .command
            .to_command(file)
            .status()
            .map_err(|source| CompileError::Spawn {
                executable: self.command.executable().to_path_buf(),
                source,
            })?;

        if status.success() {
            return Ok(FileOutcome::Compiled);
        }
        match status.code() {
            Some(code) => Err(CompileError::Failed {
                path: file.to_path_buf(),
                code,
            }),
            None => Err(CompileError::Terminated {
                path: file.to_path_buf(),
            }),
        }
    }
}

impl CompileSummary {
    fn record(&mut self, file: &Path, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Compiled => self.compiled.push(file.to_path_buf()),
            FileOutcome::Skipped => self.skipped.push(file.to_path_buf()),
        }
    }
}

//! Scenario fixtures for the Quiver schema compile driver.
//!
//! [`TestProject`] lays out a throwaway project on disk whose compiler is a
//! small shell script. The script records every schema it is asked to compile
//! and exits non-zero when the schema contains [`BROKEN`] or any file in an
//! include directory contains [`BROKEN_INCLUDE`]. Tests use it to observe
//! exactly which files a build sends to the compiler.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use quiver_compile::{BuildOutcome, CompileError, Driver, Plan};
use quiver_config::{load_config_from_str, resolve_source_set, ResolvedSourceSet};
use tempfile::TempDir;

/// Marker that makes the fake compiler fail on the schema containing it.
pub const BROKEN: &str = "BROKEN";

/// Marker that makes the fake compiler fail on every schema whose include
/// directories contain it.
pub const BROKEN_INCLUDE: &str = "BROKEN_INCLUDE";

const FAKE_COMPILER: &str = r#"schema=""
for arg; do schema="$arg"; done
echo "$schema" >> "@LOG@"
prev=""
for arg; do
  if [ "$prev" = "-I" ] && grep -rqs BROKEN_INCLUDE "$arg"; then exit 2; fi
  prev="$arg"
done
if grep -qs BROKEN "$schema"; then exit 2; fi
exit 0
"#;

/// A project directory plus a separate directory holding the fake compiler.
pub struct TestProject {
    project: TempDir,
    tools: TempDir,
    config: String,
}

impl TestProject {
    /// Creates a project with schema sources in `idl/`, compiling
    /// `idl/api/*.idl` and treating every `.idl` file as a schema.
    pub fn new() -> Self {
        Self::with_source_set(
            r#"sources = ["idl"]
schemas = ["**/*.idl"]
files = ["api/*.idl", "*.idl"]
"#,
        )
    }

    /// Creates a project whose `main` source set body is `source_set`.
    pub fn with_source_set(source_set: &str) -> Self {
        let project = tempfile::tempdir().expect("project dir");
        let tools = tempfile::tempdir().expect("tools dir");
        let script = tools.path().join("fake-thrift.sh");
        let log = tools.path().join("calls.log");
        let body = FAKE_COMPILER.replace("@LOG@", &log.to_string_lossy());
        std::fs::write(&script, body).expect("write fake compiler");

        let config = format!(
            r#"[project]
name = "scenario"

[executable]
path = "/bin/sh"
options = ["{script}"]

[source_sets.main]
{source_set}
"#,
            script = script.display(),
        );
        Self {
            project,
            tools,
            config,
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.project.path()
    }

    /// Writes a file relative to the project root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Removes a file relative to the project root.
    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.root().join(relative)).expect("remove file");
    }

    /// Appends lines to the `main` source set, changing the configuration.
    pub fn extend_source_set(&mut self, lines: &str) {
        self.config.push_str(lines);
        self.config.push('\n');
    }

    /// The resolved `main` source set.
    pub fn source_set(&self) -> ResolvedSourceSet {
        let config = load_config_from_str(&self.config).expect("valid config");
        resolve_source_set(&config, self.root(), "main").expect("resolvable source set")
    }

    /// Runs a build and returns it with the file names the compiler saw.
    pub fn build(&self) -> (Result<BuildOutcome, CompileError>, Vec<String>) {
        self.build_with(1, false)
    }

    /// Runs a build with explicit parallelism and force flag.
    pub fn build_with(
        &self,
        jobs: usize,
        force: bool,
    ) -> (Result<BuildOutcome, CompileError>, Vec<String>) {
        self.clear_calls();
        let set = self.source_set();
        let result = Driver::new(&set).build(jobs, force);
        (result, self.calls())
    }

    /// Plans a build without compiling.
    pub fn plan(&self) -> Plan {
        let set = self.source_set();
        Driver::new(&set).plan(false).expect("plan")
    }

    /// File names passed to the compiler since the last build started, sorted.
    pub fn calls(&self) -> Vec<String> {
        let log = std::fs::read_to_string(self.log_path()).unwrap_or_default();
        let mut names: Vec<String> = log
            .lines()
            .filter_map(|line| Path::new(line).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn clear_calls(&self) {
        let _ = std::fs::remove_file(self.log_path());
    }

    fn log_path(&self) -> PathBuf {
        self.tools.path().join("calls.log")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned names for comparing against [`TestProject::calls`].
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

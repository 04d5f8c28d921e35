//! `quiver build`: incremental compilation of one or every source set.

use quiver_compile::{BuildOutcome, Driver};

use crate::pipeline::load_project;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `quiver build` command.
///
/// Source sets are built in name order; the first failing set aborts the
/// command with its compiler error.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let sets = project.source_sets(args.set.as_deref())?;

    if !global.quiet {
        eprintln!("   Building {}", project.config.project.name);
    }

    for set in &sets {
        let outcome = Driver::new(set).build(args.jobs, args.force)?;
        if !global.quiet {
            report(&set.name, &outcome);
            eprintln!("   Generated {}", set.output_dir.display());
        }
    }

    if !global.quiet {
        eprintln!("    Finished {} source set(s)", sets.len());
    }
    Ok(0)
}

fn report(name: &str, outcome: &BuildOutcome) {
    let plan = &outcome.plan;
    if !plan.extracted.skipped.is_empty() {
        eprintln!(
            "     Skipped {} unsupported dependency artifact(s)",
            plan.extracted.skipped.len()
        );
    }
    if plan.selection.files.is_empty() {
        eprintln!("       Fresh {name}");
        return;
    }
    eprintln!("   Compiled {}", summary_line(name, outcome));
    if !outcome.summary.skipped.is_empty() {
        eprintln!(
            "     Skipped {} file(s) removed before compilation",
            outcome.summary.skipped.len()
        );
    }
}

fn summary_line(name: &str, outcome: &BuildOutcome) -> String {
    let plan = &outcome.plan;
    let compiled = outcome.summary.compiled.len();
    if !plan.selection.is_full() {
        return format!(
            "{name}: {compiled} of {} file(s) ({})",
            plan.input_files.len(),
            plan.selection.reason
        );
    }
    let why = match plan.observation.report.rebuild_reason {
        Some(reason) => reason.to_string(),
        None => plan.selection.reason.to_string(),
    };
    format!("{name}: all {compiled} file(s) (full build: {why})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_compile::CompileSummary;
    use quiver_config::{load_config_from_str, resolve_source_set};

    #[test]
    fn first_build_is_reported_as_full() {
        let dir = tempfile::tempdir().unwrap();
        let idl = dir.path().join("src/main/thrift");
        std::fs::create_dir_all(&idl).unwrap();
        std::fs::write(idl.join("A.thrift"), "struct A {}").unwrap();

        let config = load_config_from_str("[project]\nname = \"x\"\n").unwrap();
        let set = resolve_source_set(&config, dir.path(), "main").unwrap();
        let plan = Driver::new(&set).plan(false).unwrap();
        let outcome = BuildOutcome {
            summary: CompileSummary {
                compiled: plan.selection.files.clone(),
                skipped: Vec::new(),
            },
            plan,
        };

        assert_eq!(
            summary_line("main", &outcome),
            "main: all 1 file(s) (full build: no previous run state)"
        );
    }
}

//! `quiver status`: report changes and the files a build would compile.
//!
//! Dependencies are re-extracted so the report reflects the current inputs,
//! but nothing is compiled and run state is left untouched.

use quiver_compile::{Driver, Plan};

use crate::pipeline::load_project;
use crate::{GlobalArgs, SetArgs};

/// Runs the `quiver status` command.
pub fn run(args: &SetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;

    for set in project.source_sets(args.set.as_deref())? {
        let plan = Driver::new(&set).plan(false)?;
        print!("{}", render(&set.name, &plan));
    }
    Ok(0)
}

fn render(name: &str, plan: &Plan) -> String {
    let report = &plan.observation.report;
    let mut out = match report.rebuild_reason {
        Some(reason) => format!("{name}: full build ({reason})\n"),
        None => format!("{name}: {}\n", plan.selection.reason),
    };
    if report.is_incremental() {
        for (path, status) in report.inputs.changes() {
            out.push_str(&format!("  {status:>9} {}\n", path.display()));
        }
        for (path, status) in report.includes.changes() {
            if report.inputs.status_of(path).is_none() {
                out.push_str(&format!("  {status:>9} {} (include)\n", path.display()));
            }
        }
    }
    out.push_str(&format!(
        "  would compile {} of {} file(s)\n",
        plan.selection.files.len(),
        plan.input_files.len()
    ));
    for file in &plan.selection.files {
        out.push_str(&format!("    {}\n", file.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_config::{load_config_from_str, resolve_source_set};

    #[test]
    fn first_run_reports_full_build() {
        let dir = tempfile::tempdir().unwrap();
        let idl = dir.path().join("src/main/thrift");
        std::fs::create_dir_all(&idl).unwrap();
        std::fs::write(idl.join("A.thrift"), "struct A {}").unwrap();

        let config = load_config_from_str("[project]\nname = \"x\"\n").unwrap();
        let set = resolve_source_set(&config, dir.path(), "main").unwrap();
        let plan = Driver::new(&set).plan(false).unwrap();

        let text = render("main", &plan);
        assert!(text.starts_with("main: full build (no previous run state)"));
        assert!(text.contains("would compile 1 of 1 file(s)"));
        assert!(text.contains("A.thrift"));
    }
}

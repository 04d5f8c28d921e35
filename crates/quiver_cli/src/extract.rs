//! `quiver extract`: stage dependency schemas without compiling.

use quiver_compile::Driver;

use crate::pipeline::load_project;
use crate::{GlobalArgs, SetArgs};

/// Runs the `quiver extract` command.
pub fn run(args: &SetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;

    for set in project.source_sets(args.set.as_deref())? {
        let report = Driver::new(&set).extract()?;
        if !global.quiet {
            eprintln!(
                "   Extracted {} schema file(s) for {} into {}",
                report.files.len(),
                set.name,
                set.extract_dir.display()
            );
            for skipped in &report.skipped {
                eprintln!("     Skipped {}", skipped.display());
            }
        }
    }
    Ok(0)
}

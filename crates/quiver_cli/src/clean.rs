//! `quiver clean`: remove extracted schemas, generated output and run state.

use quiver_compile::Driver;

use crate::pipeline::load_project;
use crate::{GlobalArgs, SetArgs};

/// Runs the `quiver clean` command.
pub fn run(args: &SetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;

    for set in project.source_sets(args.set.as_deref())? {
        Driver::new(&set).clean()?;
        if !global.quiet {
            eprintln!("     Removed {}", set.output_dir.display());
        }
    }
    Ok(0)
}

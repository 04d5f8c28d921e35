//! Quiver CLI: drives a Thrift-compatible schema compiler over a project.
//!
//! Provides `quiver build` for incremental compilation, `quiver extract` to
//! stage dependency schemas, `quiver status` to preview what a build would
//! compile, and `quiver clean` to remove generated artifacts and run state.

#![warn(missing_docs)]

mod build;
mod clean;
mod extract;
mod pipeline;
mod status;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Quiver: incremental schema compilation.
#[derive(Parser, Debug)]
#[command(name = "quiver", version, about = "Incremental Thrift schema compile driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `quiver.toml` file or the project directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile changed schema files.
    Build(BuildArgs),
    /// Stage dependency schemas into the extract directory.
    Extract(SetArgs),
    /// Show what a build would compile, without compiling.
    Status(SetArgs),
    /// Remove extracted schemas, generated output and run state.
    Clean(SetArgs),
}

/// Arguments for the `quiver build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Source set to build. Builds every source set if omitted.
    pub set: Option<String>,

    /// Number of compiler processes to run at once.
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Ignore previous run state and compile every schema file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for subcommands that act on source sets.
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Source set name. Every source set if omitted.
    pub set: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file or project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Extract(ref args) => extract::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

//! Schema compilation: deciding what to compile and invoking the compiler.
//!
//! [`select_files_to_compile`] turns a change report into the set of schema
//! files to send to the compiler. [`CompileCommand`] assembles one invocation,
//! [`Runner`] executes them and stops at the first failure, and [`Driver`]
//! ties extraction, change tracking and compilation together for a source set.

#![warn(missing_docs)]

pub mod command;
pub mod driver;
pub mod error;
pub mod runner;
pub mod select;

pub use command::{CompileCommand, OutputLayout};
pub use driver::{BuildOutcome, Driver, Plan, TOOL_VERSION};
pub use error::CompileError;
pub use runner::{CompileSummary, Runner};
pub use select::{select_files_to_compile, Selection, SelectionReason};

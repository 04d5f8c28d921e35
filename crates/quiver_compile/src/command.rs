//! Assembly of a single schema compiler invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use quiver_common::GeneratorSpec;

/// How generators lay out files under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Every generator writes to `<out>/gen-<name>/` (`-o`).
    Nested,
    /// Generated files go directly under `<out>` (`-out`).
    #[default]
    Flat,
}

impl OutputLayout {
    /// Picks the layout from the `nested_output` setting.
    pub fn from_nested(nested: bool) -> Self {
        if nested {
            OutputLayout::Nested
        } else {
            OutputLayout::Flat
        }
    }

    /// The compiler flag that introduces the output directory.
    pub fn flag(self) -> &'static str {
        match self {
            OutputLayout::Nested => "-o",
            OutputLayout::Flat => "-out",
        }
    }
}

/// Everything except the schema file needed to invoke the compiler.
///
/// Arguments are produced in a fixed order: executable options, `--gen` per
/// generator, the output flag, `-I` per include directory, then the schema
/// file's absolute path.
#[derive(Debug, Clone)]
pub struct CompileCommand {
    executable: PathBuf,
    executable_options: Vec<String>,
    generators: Vec<GeneratorSpec>,
    layout: OutputLayout,
    output_dir: PathBuf,
    include_dirs: Vec<PathBuf>,
}

impl CompileCommand {
    /// Starts a command for `executable` writing into `output_dir`.
    pub fn new(executable: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            executable_options: Vec::new(),
            generators: Vec::new(),
            layout: OutputLayout::default(),
            output_dir: output_dir.into(),
            include_dirs: Vec::new(),
        }
    }

    /// Appends options passed to the compiler before any generator flag.
    pub fn executable_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executable_options
            .extend(options.into_iter().map(Into::into));
        self
    }

    /// Appends a generator.
    pub fn generator(mut self, spec: GeneratorSpec) -> Self {
        self.generators.push(spec);
        self
    }

    /// Appends generators in order.
    pub fn generators(mut self, specs: impl IntoIterator<Item = GeneratorSpec>) -> Self {
        self.generators.extend(specs);
        self
    }

    /// Sets the output layout.
    pub fn layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Appends an include search directory.
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Appends include search directories in order.
    pub fn include_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.include_dirs.extend(dirs);
        self
    }

    /// The compiler executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The output root passed to the compiler.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Arguments (without the executable) for compiling `schema`.
    pub fn args_for(&self, schema: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .executable_options
            .iter()
            .map(OsString::from)
            .collect();

        for generator in &self.generators {
            args.push("--gen".into());
            args.push(generator.to_string().into());
        }

        args.push(self.layout.flag().into());
        args.push(self.output_dir.clone().into_os_string());

        for dir in &self.include_dirs {
            args.push("-I".into());
            args.push(dir.clone().into_os_string());
        }

        args.push(absolute(schema).into_os_string());
        args
    }

    /// A ready-to-spawn process for compiling `schema`.
    pub fn to_command(&self, schema: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.args_for(schema));
        cmd
    }

    /// Shell-like rendering of the full command line, for logs.
    pub fn render(&self, schema: &Path) -> String {
        std::iter::once(self.executable.clone().into_os_string())
            .chain(self.args_for(schema))
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn flat_single_generator() {
        let cmd = CompileCommand::new("thrift", "/out")
            .generator(GeneratorSpec::new("java", vec![]))
            .include_dir("/src/main/thrift")
            .include_dir("/build/download/thrift/main");
        assert_eq!(
            strings(cmd.args_for(Path::new("/src/main/thrift/A.thrift"))),
            vec![
                "--gen",
                "java",
                "-out",
                "/out",
                "-I",
                "/src/main/thrift",
                "-I",
                "/build/download/thrift/main",
                "/src/main/thrift/A.thrift",
            ]
        );
    }

    #[test]
    fn nested_generators_with_options_in_order() {
        let cmd = CompileCommand::new("/opt/thrift", "/out")
            .executable_options(["--strict", "-v"])
            .generators([
                GeneratorSpec::new("java", vec!["beans".into(), "hashcode".into()]),
                GeneratorSpec::new("py", vec![]),
            ])
            .layout(OutputLayout::Nested);
        assert_eq!(
            cmd.render(Path::new("/s/A.thrift")),
            "/opt/thrift --strict -v --gen java:beans,hashcode --gen py -o /out /s/A.thrift"
        );
    }

    #[test]
    fn relative_schema_is_made_absolute() {
        let cmd = CompileCommand::new("thrift", "/out").generator(GeneratorSpec::new("js", vec![]));
        let args = cmd.args_for(Path::new("idl/A.thrift"));
        let last = PathBuf::from(args.last().unwrap());
        assert!(last.is_absolute());
        assert!(last.ends_with("idl/A.thrift"));
    }

    #[test]
    fn layout_flags() {
        assert_eq!(OutputLayout::from_nested(true).flag(), "-o");
        assert_eq!(OutputLayout::from_nested(false).flag(), "-out");
    }

    #[test]
    fn to_command_uses_executable() {
        let cmd = CompileCommand::new("thrift", "/out");
        let process = cmd.to_command(Path::new("/s/A.thrift"));
        assert_eq!(process.get_program(), "thrift");
        assert_eq!(process.get_args().count(), 3);
    }
}

//! Schema file pattern matching and directory discovery.
//!
//! Patterns are Ant-style globs evaluated against `/`-separated paths relative
//! to a root (a source directory or an archive). `**/` matches zero or more
//! directories, `*` never crosses a separator.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

/// The default pattern selecting Thrift schema files at any depth.
pub const DEFAULT_SCHEMA_GLOB: &str = "**/*.thrift";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A glob pattern string that failed to compile.
#[derive(Debug, thiserror::Error)]
#[error("invalid schema pattern '{pattern}': {reason}")]
pub struct PatternError {
    /// The offending pattern text.
    pub pattern: String,
    /// Why the glob parser rejected it.
    pub reason: String,
}

/// A set of globs; a path matches if any of them matches.
#[derive(Debug, Clone)]
pub struct SchemaPattern {
    patterns: Vec<Pattern>,
    /// Last component of each glob, for bare file names.
    names: Vec<Pattern>,
}

impl SchemaPattern {
    /// Compiles a list of glob strings.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, PatternError> {
        let mut patterns = Vec::with_capacity(globs.len());
        let mut names = Vec::with_capacity(globs.len());
        for glob in globs {
            let glob = glob.as_ref();
            patterns.push(compile(glob, glob)?);
            let last = glob.rsplit('/').next().unwrap_or(glob);
            names.push(compile(last, glob)?);
        }
        Ok(Self { patterns, names })
    }

    /// Returns the glob strings this pattern was built from.
    pub fn globs(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.as_str().to_string()).collect()
    }

    /// Matches a `/`-separated relative path, as found in archive entries.
    pub fn matches_str(&self, relative: &str) -> bool {
        let relative = relative.trim_start_matches("./");
        self.patterns
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    /// Matches a file name on its own, ignoring any directories in the globs.
    ///
    /// `api/**/*.thrift` accepts `Base.thrift` here. Used for dependency
    /// artifacts that are single schema files with no meaningful parent.
    pub fn matches_file_name(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    /// Matches a filesystem path relative to some root.
    pub fn matches_relative(&self, relative: &Path) -> bool {
        self.matches_str(&to_slash(relative))
    }

    /// Recursively collects files under `root` whose relative path matches.
    ///
    /// Returns absolute-as-given paths sorted for deterministic ordering. A
    /// missing root yields an empty list.
    pub fn collect(&self, root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if root.is_dir() {
            walk_dir(root, root, &mut |rel, path| {
                if self.matches_relative(rel) {
                    files.push(path.to_path_buf());
                }
            })?;
        }
        files.sort();
        Ok(files)
    }
}

impl Default for SchemaPattern {
    fn default() -> Self {
        Self::new(&[DEFAULT_SCHEMA_GLOB]).expect("default glob is valid")
    }
}

fn compile(text: &str, glob: &str) -> Result<Pattern, PatternError> {
    Pattern::new(text).map_err(|e| PatternError {
        pattern: glob.to_string(),
        reason: e.msg.to_string(),
    })
}

/// Recursively collects every regular file under `root`, sorted.
pub fn collect_all_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if root.is_dir() {
        walk_dir(root, root, &mut |_, path| files.push(path.to_path_buf()))?;
    }
    files.sort();
    Ok(files)
}

/// Renders a relative path with `/` separators, dropping `.` components.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    visit: &mut dyn FnMut(&Path, &Path),
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(root, &path, visit)?;
        } else if path.is_file() {
            if let Ok(rel) = path.strip_prefix(root) {
                visit(rel, &path);
            }
        }
    }
    Ok(())
}

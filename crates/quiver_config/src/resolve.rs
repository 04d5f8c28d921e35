//! Source set resolution: project-relative settings to absolute, ready-to-run values.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, SourceSetConfig, DEFAULT_SOURCE_SET};
use quiver_common::{ContentHash, GeneratorSpec, SchemaPattern};
use std::path::{Path, PathBuf};

/// A source set with every path made absolute and every pattern compiled.
#[derive(Debug, Clone)]
pub struct ResolvedSourceSet {
    /// The source set name.
    pub name: String,
    /// Compiler binary; a bare name is resolved through `PATH` at spawn time.
    pub executable: PathBuf,
    /// Compiler options placed before generator flags.
    pub executable_options: Vec<String>,
    /// Generators in command-line order.
    pub generators: Vec<GeneratorSpec>,
    /// Whether each generator writes to its own `gen-<name>` folder.
    pub nested_output: bool,
    /// Schema source directories.
    pub sources: Vec<PathBuf>,
    /// Dependency artifacts to extract.
    pub dependencies: Vec<PathBuf>,
    /// Staging directory for extracted dependency schemas.
    pub extract_dir: PathBuf,
    /// Generated output root.
    pub output_dir: PathBuf,
    /// Run state directory.
    pub state_dir: PathBuf,
    /// Recognizes schema files.
    pub schema_pattern: SchemaPattern,
    /// Selects the schema files that are compiled.
    pub compile_pattern: SchemaPattern,
}

impl ResolvedSourceSet {
    /// Include search roots: every source directory, then the extract directory.
    pub fn include_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.sources.clone();
        dirs.push(self.extract_dir.clone());
        dirs
    }

    /// Directories scanned for compile candidates, in order.
    pub fn input_roots(&self) -> Vec<PathBuf> {
        self.include_dirs()
    }

    /// Hash of every setting that shapes a compiler invocation.
    ///
    /// A different fingerprint from the previous run disables incremental
    /// selection.
    pub fn fingerprint(&self) -> ContentHash {
        let mut parts = vec![
            "executable".to_string(),
            self.executable.to_string_lossy().into_owned(),
        ];
        parts.extend(self.executable_options.iter().cloned());
        parts.push("generators".to_string());
        parts.extend(self.generators.iter().map(|g| g.to_string()));
        parts.push(format!("nested={}", self.nested_output));
        parts.push(self.output_dir.to_string_lossy().into_owned());
        parts.push("includes".to_string());
        parts.extend(
            self.include_dirs()
                .iter()
                .map(|d| d.to_string_lossy().into_owned()),
        );
        parts.push("files".to_string());
        parts.extend(self.compile_pattern.globs());
        parts.push("schemas".to_string());
        parts.extend(self.schema_pattern.globs());
        ContentHash::from_parts(parts)
    }
}

/// Resolves a named source set against the project directory.
///
/// When the configuration declares no source sets at all, `main` resolves to
/// the defaults.
pub fn resolve_source_set(
    config: &ProjectConfig,
    project_dir: &Path,
    name: &str,
) -> Result<ResolvedSourceSet, ConfigError> {
    let default_set;
    let set = match config.source_sets.get(name) {
        Some(set) => set,
        None if config.source_sets.is_empty() && name == DEFAULT_SOURCE_SET => {
            default_set = SourceSetConfig::default();
            &default_set
        }
        None => return Err(ConfigError::UnknownSourceSet(name.to_string())),
    };

    let sources = match &set.sources {
        Some(dirs) => dirs.iter().map(|d| absolute(project_dir, d)).collect(),
        None => vec![project_dir.join("src").join(name).join("thrift")],
    };

    let output_dir = match &set.output_dir {
        Some(dir) => absolute(project_dir, dir),
        None => absolute(project_dir, &config.paths.output_dir).join(name),
    };

    Ok(ResolvedSourceSet {
        name: name.to_string(),
        executable: resolve_executable(project_dir, &config.executable.path)?,
        executable_options: config.executable.options.clone(),
        generators: set.effective_generators(),
        nested_output: set.nested_output,
        sources,
        dependencies: set
            .dependencies
            .iter()
            .map(|d| absolute(project_dir, d))
            .collect(),
        extract_dir: absolute(project_dir, &config.paths.extract_dir).join(name),
        output_dir,
        state_dir: absolute(project_dir, &config.paths.state_dir).join(name),
        schema_pattern: SchemaPattern::new(&set.schemas)?,
        compile_pattern: SchemaPattern::new(&set.files)?,
    })
}

/// A bare command name stays as is; anything path-like must exist.
fn resolve_executable(project_dir: &Path, executable: &str) -> Result<PathBuf, ConfigError> {
    let as_path = Path::new(executable);
    if as_path.components().count() == 1 && !as_path.is_absolute() {
        return Ok(as_path.to_path_buf());
    }
    let resolved = absolute(project_dir, executable);
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(ConfigError::ExecutableNotFound(resolved))
    }
}

fn absolute(project_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        project_dir.join(p)
    }
}

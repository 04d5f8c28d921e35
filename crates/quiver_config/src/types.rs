//! Configuration types deserialized from `quiver.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use quiver_common::{GeneratorSpec, DEFAULT_SCHEMA_GLOB};

/// Name of the source set used when the configuration declares none.
pub const DEFAULT_SOURCE_SET: &str = "main";

/// The top-level project configuration parsed from `quiver.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Location and global options of the schema compiler.
    #[serde(default)]
    pub executable: ExecutableConfig,
    /// Roots for staging, generated output, and run state.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Named source sets (e.g., "main", "test").
    #[serde(default)]
    pub source_sets: BTreeMap<String, SourceSetConfig>,
}

impl ProjectConfig {
    /// Returns the declared source set names, or `main` when none are declared.
    pub fn source_set_names(&self) -> Vec<String> {
        if self.source_sets.is_empty() {
            vec![DEFAULT_SOURCE_SET.to_string()]
        } else {
            self.source_sets.keys().cloned().collect()
        }
    }
}

/// Core project metadata required in every `quiver.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// The external schema compiler.
#[derive(Debug, Deserialize)]
pub struct ExecutableConfig {
    /// Bare command name (looked up on `PATH`) or a path to the binary.
    #[serde(default = "default_executable")]
    pub path: String,
    /// Options placed before any generator flags, verbatim.
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for ExecutableConfig {
    fn default() -> Self {
        Self {
            path: default_executable(),
            options: Vec::new(),
        }
    }
}

fn default_executable() -> String {
    "thrift".to_string()
}

/// Project-relative roots; each source set gets a subdirectory named after it.
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Where dependency schemas are extracted.
    #[serde(default = "default_extract_dir")]
    pub extract_dir: String,
    /// Where generated sources are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Where run state is persisted between builds.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            extract_dir: default_extract_dir(),
            output_dir: default_output_dir(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_extract_dir() -> String {
    "build/download/thrift".to_string()
}

fn default_output_dir() -> String {
    "build/generated-sources/thrift".to_string()
}

fn default_state_dir() -> String {
    ".quiver".to_string()
}

/// Compilation settings for one source set.
#[derive(Debug, Deserialize)]
pub struct SourceSetConfig {
    /// Friendly target language; mapped to a generator code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Options for the language generator.
    #[serde(default)]
    pub options: Vec<String>,
    /// Explicit generators, in order. Replaces `language`/`options` when set.
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,
    /// Schema source directories. Defaults to `src/<set>/thrift`.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub sources: Option<Vec<String>>,
    /// Globs recognizing schema files in sources and dependencies.
    #[serde(default = "default_schema_globs", deserialize_with = "deserialize_string_or_vec")]
    pub schemas: Vec<String>,
    /// Globs selecting which schema files are compiled.
    #[serde(default = "default_schema_globs", deserialize_with = "deserialize_string_or_vec")]
    pub files: Vec<String>,
    /// Dependency artifacts: directories, schema files, or archives.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub dependencies: Vec<String>,
    /// Give each generator its own `gen-<name>` output folder.
    #[serde(default)]
    pub nested_output: bool,
    /// Overrides `<paths.output_dir>/<set>`.
    #[serde(default)]
    pub output_dir: Option<String>,
}

impl Default for SourceSetConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            options: Vec::new(),
            generators: Vec::new(),
            sources: None,
            schemas: default_schema_globs(),
            files: default_schema_globs(),
            dependencies: Vec::new(),
            nested_output: false,
            output_dir: None,
        }
    }
}

impl SourceSetConfig {
    /// The generators to run, in command-line order.
    pub fn effective_generators(&self) -> Vec<GeneratorSpec> {
        if self.generators.is_empty() {
            vec![GeneratorSpec::for_language(
                &self.language,
                self.options.clone(),
            )]
        } else {
            self.generators.clone()
        }
    }
}

fn default_language() -> String {
    "java".to_string()
}

fn default_schema_globs() -> Vec<String> {
    vec![DEFAULT_SCHEMA_GLOB.to_string()]
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `files = "**/*.thrift"` as well as `files = ["a/*.thrift", "b/*.thrift"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

fn deserialize_opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_string_or_vec(deserializer).map(Some)
}

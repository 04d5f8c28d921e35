//! Generator backends of the external schema compiler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One generator backend with its backend-specific options.
///
/// Renders as the argument following `--gen`: the bare name, or
/// `name:opt1,opt2` when options are present. Options are joined verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorSpec {
    /// Generator code understood by the compiler (e.g. `java`, `py`).
    pub name: String,
    /// Options passed through unchanged.
    #[serde(default)]
    pub options: Vec<String>,
}

impl GeneratorSpec {
    /// Creates a spec from a generator code and options.
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Creates a spec from a friendly language name.
    pub fn for_language(language: &str, options: Vec<String>) -> Self {
        Self::new(generator_code(language), options)
    }
}

impl fmt::Display for GeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.name, self.options.join(","))
        }
    }
}

/// Maps a friendly language name to the compiler's generator code.
pub fn generator_code(language: &str) -> &str {
    match language {
        "python" => "py",
        "javascript" => "js",
        other => other,
    }
}

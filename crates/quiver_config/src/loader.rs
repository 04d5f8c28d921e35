//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use quiver_common::SchemaPattern;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "quiver.toml";

/// Loads and validates a `quiver.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `quiver.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and the consistency of each source set.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.executable.path.is_empty() {
        return Err(ConfigError::MissingField("executable.path".to_string()));
    }

    for (name, set) in &config.source_sets {
        if set.generators.is_empty() && set.language.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "source_sets.{name}.language"
            )));
        }
        let generators = set.effective_generators();
        if let Some(gen) = generators.iter().find(|g| g.name.is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "source set '{name}' has a generator without a name (options: {:?})",
                gen.options
            )));
        }
        if !set.nested_output && generators.len() > 1 {
            return Err(ConfigError::ValidationError(format!(
                "source set '{name}' has {} generators sharing one flat output directory; \
                 set nested_output = true",
                generators.len()
            )));
        }
        SchemaPattern::new(&set.schemas)?;
        SchemaPattern::new(&set.files)?;
    }
    Ok(())
}

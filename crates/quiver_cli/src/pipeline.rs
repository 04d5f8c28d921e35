//! Shared helpers for CLI commands: project discovery and source set selection.

use std::error::Error;
use std::path::{Path, PathBuf};

use quiver_config::{
    load_config, load_config_from_str, resolve_source_set, ConfigError, ProjectConfig,
    ResolvedSourceSet, CONFIG_FILE,
};

use crate::GlobalArgs;

/// A loaded project: its root directory and parsed configuration.
pub struct Project {
    /// Directory that relative configuration paths resolve against.
    pub root: PathBuf,
    /// The parsed `quiver.toml`.
    pub config: ProjectConfig,
}

impl Project {
    /// Resolves the named source set, or every source set in name order.
    pub fn source_sets(&self, name: Option<&str>) -> Result<Vec<ResolvedSourceSet>, ConfigError> {
        let names = match name {
            Some(name) => vec![name.to_string()],
            None => self.config.source_set_names(),
        };
        names
            .iter()
            .map(|n| resolve_source_set(&self.config, &self.root, n))
            .collect()
    }
}

/// Walks up from `start` looking for the nearest directory containing `quiver.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the project selected by the global arguments.
///
/// `--config` may name a configuration file (its directory becomes the
/// project root) or a project directory. Without it, the current directory
/// and its parents are searched.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn Error>> {
    let (root, config) = match &global.config {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (root, load_config_from_str(&content)?)
            } else {
                let config = load_config(&path)?;
                (path, config)
            }
        }
        None => {
            let root = find_project_root(&std::env::current_dir()?)?;
            let config = load_config(&root)?;
            (root, config)
        }
    };
    let root = std::path::absolute(&root)?;
    tracing::debug!(
        "loaded project '{}' from {}",
        config.project.name,
        root.display()
    );
    Ok(Project { root, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: config.map(|p| p.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn finds_root_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"x\"\n").unwrap();
        let nested = dir.path().join("src/main/thrift");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn config_flag_accepts_file_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "[project]\nname = \"custom\"\n").unwrap();
        let project = load_project(&global(Some(&file))).unwrap();
        assert_eq!(project.config.project.name, "custom");
        assert_eq!(project.root, dir.path());

        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"dir\"\n").unwrap();
        let project = load_project(&global(Some(dir.path()))).unwrap();
        assert_eq!(project.config.project.name, "dir");
    }

    #[test]
    fn source_sets_in_name_order() {
        let config = load_config_from_str(
            "[project]\nname = \"x\"\n[source_sets.test]\n[source_sets.main]\n",
        )
        .unwrap();
        let project = Project {
            root: PathBuf::from("/p"),
            config,
        };
        let names: Vec<_> = project
            .source_sets(None)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["main", "test"]);
        assert_eq!(project.source_sets(Some("test")).unwrap().len(), 1);
        assert!(project.source_sets(Some("bench")).is_err());
    }
}

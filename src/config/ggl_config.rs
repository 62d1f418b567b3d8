//! ggl configuration file handling
//!
//! Loads the YAML file listing the repositories to aggregate.

use super::repository::RepositoryRef;
use crate::{GglError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "ggl.yaml";

/// Fallback config file in the current directory
pub const LOCAL_CONFIG_FILE: &str = "config.yaml";

/// ggl configuration
///
/// Represents the complete config file: a shared root directory and the
/// ordered list of repositories. Repository order is the order they are read
/// and the tie-break order of the final log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GglConfig {
    /// Directory every repository path is relative to ("~/" is expanded)
    #[serde(default)]
    pub root: PathBuf,

    /// Repositories, in configuration order
    #[serde(default)]
    pub repositories: Vec<RepositoryRef>,
}

impl GglConfig {
    /// Create an empty configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            repositories: Vec::new(),
        }
    }

    /// Add a repository at the end of the list
    pub fn add_repository(&mut self, repository: RepositoryRef) {
        self.repositories.push(repository);
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(GglError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading ggl configuration");

        let content = fs::read_to_string(path).map_err(|e| {
            GglError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;

        tracing::debug!(
            repositories = config.repositories.len(),
            root = %config.root.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Resolve which config file to read
    ///
    /// An explicit path wins. Otherwise `ggl.yaml` in the platform config
    /// directory is used if present, falling back to `config.yaml` in the
    /// current directory.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Some(dir) = dirs::config_dir() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return candidate;
            }
        }

        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// The root directory with a leading `~/` expanded to the home directory
    pub fn root_dir(&self) -> PathBuf {
        expand_home(&self.root)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
root: /home/dev/src
repositories:
  - name: api
    path: api
    remote: upstream
    branch: main
    fetch: true
  - name: web
    path: web
    branch: develop
"#;

    #[test]
    fn test_from_yaml() {
        let config = GglConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.root, PathBuf::from("/home/dev/src"));
        assert_eq!(config.repositories.len(), 2);

        let api = &config.repositories[0];
        assert_eq!(api.revision(), "upstream/main");
        assert!(api.fetch);

        let web = &config.repositories[1];
        assert_eq!(web.revision(), "origin/develop");
        assert!(!web.fetch);
    }

    #[test]
    fn test_order_preserved() {
        let config = GglConfig::from_yaml(SAMPLE).unwrap();
        let names: Vec<&str> = config.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["api", "web"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = GglConfig::load(file.path()).unwrap();
        assert_eq!(config.repositories.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = GglConfig::load("/nonexistent/ggl.yaml");
        assert!(matches!(result, Err(GglError::Config(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"repositories: [ {name: api").unwrap();

        let result = GglConfig::load(file.path());
        assert!(matches!(result, Err(GglError::Yaml(_))));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let config = GglConfig::from_yaml("repositories: []").unwrap();
        assert_eq!(config.root, PathBuf::new());
        assert_eq!(config.root_dir(), PathBuf::new());
    }

    #[test]
    fn test_resolve_path_explicit() {
        let path = GglConfig::resolve_path(Some(Path::new("/etc/ggl/custom.yaml")));
        assert_eq!(path, PathBuf::from("/etc/ggl/custom.yaml"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/src")), home.join("src"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
        assert_eq!(expand_home(Path::new("rel/~x")), PathBuf::from("rel/~x"));
    }
}

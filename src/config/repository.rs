//! Repository entry configuration
//!
//! One entry of the `repositories:` list: where the repository lives, which
//! remote-tracking branch to read, whether it may be fetched, and optional
//! path filters.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a matching filter keeps or drops a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Keep commits touching a matching path
    #[serde(alias = "Include")]
    Include,

    /// Drop commits touching a matching path
    #[serde(alias = "Reject")]
    Reject,
}

/// A path filter applied to each walked commit's changed files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilter {
    pub filter_type: FilterType,

    /// Substrings matched against changed file paths
    pub paths: Vec<String>,
}

impl PathFilter {
    pub fn include<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_type: FilterType::Include,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn reject<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_type: FilterType::Reject,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decide whether a commit touching `changed` survives `filters`.
///
/// Filters are visited in order, then each filter path, then each changed
/// file; the first changed file containing a filter path decides. A commit
/// matching nothing is dropped.
pub fn filters_accept(filters: &[PathFilter], changed: &[PathBuf]) -> bool {
    for filter in filters {
        for filter_path in &filter.paths {
            for file in changed {
                if file.to_string_lossy().contains(filter_path.as_str()) {
                    return filter.filter_type == FilterType::Include;
                }
            }
        }
    }
    false
}

/// A configured repository
///
/// Immutable once loaded; shared by every commit record read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Display name, shown on every log entry
    pub name: String,

    /// Path relative to the configuration root
    pub path: PathBuf,

    /// Remote name (e.g., "origin")
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch on the remote to read
    pub branch: String,

    /// Whether `--fetch` may fetch this repository
    #[serde(default)]
    pub fetch: bool,

    /// Optional path filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<PathFilter>,
}

fn default_remote() -> String {
    "origin".to_string()
}

impl RepositoryRef {
    /// Create a repository entry reading `origin/<branch>`
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            remote: default_remote(),
            branch: branch.into(),
            fetch: false,
            filters: Vec::new(),
        }
    }

    /// Set the remote name
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Allow fetching this repository
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Append a path filter
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// The revision read for this repository: `<remote>/<branch>`
    pub fn revision(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    /// Location on disk given the shared configuration root
    pub fn location(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision() {
        let repo = RepositoryRef::new("api", "api", "main").with_remote("upstream");
        assert_eq!(repo.revision(), "upstream/main");
    }

    #[test]
    fn test_location_joins_root() {
        let repo = RepositoryRef::new("api", "services/api", "main");
        assert_eq!(
            repo.location(Path::new("/src")),
            PathBuf::from("/src/services/api")
        );
        assert_eq!(repo.location(Path::new("")), PathBuf::from("services/api"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let yaml = "name: api\npath: api\nbranch: main\n";
        let repo: RepositoryRef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(repo.remote, "origin");
        assert!(!repo.fetch);
        assert!(repo.filters.is_empty());
    }

    #[test]
    fn test_deserialize_filters() {
        let yaml = r#"
name: api
path: api
branch: main
filters:
  - filter_type: include
    paths: ["src/"]
  - filter_type: Reject
    paths: ["docs/"]
"#;
        let repo: RepositoryRef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(repo.filters.len(), 2);
        assert_eq!(repo.filters[0].filter_type, FilterType::Include);
        assert_eq!(repo.filters[1].filter_type, FilterType::Reject);
    }

    #[test]
    fn test_filters_first_match_decides() {
        let filters = vec![PathFilter::reject(["vendor/"]), PathFilter::include(["src/"])];

        let vendored = vec![PathBuf::from("src/lib.rs"), PathBuf::from("vendor/x.rs")];
        assert!(!filters_accept(&filters, &vendored));

        let source = vec![PathBuf::from("src/lib.rs")];
        assert!(filters_accept(&filters, &source));
    }

    #[test]
    fn test_filters_no_match_drops() {
        let filters = vec![PathFilter::include(["src/"])];
        assert!(!filters_accept(&filters, &[PathBuf::from("README.md")]));
        assert!(!filters_accept(&filters, &[]));
    }
}

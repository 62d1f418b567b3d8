//! Error types for ggl
//!
//! Every failure is fatal to a run: the first error raised while loading
//! configuration, parsing flags, or reading any repository aborts the whole
//! aggregation and nothing is printed. Uses thiserror for the enum.

use crate::git::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ggl operations
pub type Result<T> = std::result::Result<T, GglError>;

/// Error type for ggl operations
#[derive(Error, Debug)]
pub enum GglError {
    /// Configuration file missing, unreadable, or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed command-line input (e.g. `--until`)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Configured path is not a git repository
    #[error("Failed to open repository at {}: {message}", path.display())]
    RepositoryOpen { path: PathBuf, message: String },

    /// Remote fetch failed (anything other than "already up to date")
    #[error("Failed to fetch {remote} for {repository}: {message}")]
    Fetch {
        repository: String,
        remote: String,
        message: String,
    },

    /// `<remote>/<branch>` does not resolve to a commit
    #[error("Failed to resolve {revision} in {repository}: {message}")]
    RevisionResolution {
        repository: String,
        revision: String,
        message: String,
    },

    /// Git2 library errors raised while walking history
    #[error("Git library error: {0}")]
    Git2(#[from] git2::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("Configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Backend errors surfacing mid-walk carry no repository context
impl From<BackendError> for GglError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Git2(e) => GglError::Git2(e),
            other => GglError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_open_display() {
        let err = GglError::RepositoryOpen {
            path: PathBuf::from("/tmp/missing"),
            message: "could not find repository".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing"));
        assert!(msg.contains("could not find repository"));
    }

    #[test]
    fn test_revision_display() {
        let err = GglError::RevisionResolution {
            repository: "api".to_string(),
            revision: "origin/main".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to resolve origin/main in api: not found"
        );
    }

    #[test]
    fn test_yaml_error_reads_as_config_error() {
        let err: GglError = serde_yaml::from_str::<Vec<String>>("{ not: [a list")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}

//! Configuration validation
//!
//! Validates a ggl configuration before any repository is touched:
//! - Required repository fields are non-empty
//! - Filters name at least one path

use super::ggl_config::GglConfig;
use super::repository::RepositoryRef;
use crate::GglError;
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub repository: Option<String>,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: None,
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref repo) = self.repository {
            write!(f, "[{}] {}: {}", repo, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a ggl configuration
pub fn validate_config(config: &GglConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.repositories.is_empty() {
        tracing::warn!("No repositories configured; the log will be empty");
    }

    let mut seen_names = HashSet::new();
    for repo in &config.repositories {
        if !repo.name.is_empty() && !seen_names.insert(&repo.name) {
            tracing::warn!(repository = %repo.name, "Repository name listed more than once");
        }
    }

    for repo in &config.repositories {
        if let Err(mut repo_errors) = validate_repository(repo) {
            errors.append(&mut repo_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_repository(repo: &RepositoryRef) -> ValidationResult {
    let mut errors = Vec::new();

    let required = [
        ("name", repo.name.is_empty()),
        ("path", repo.path.as_os_str().is_empty()),
        ("remote", repo.remote.is_empty()),
        ("branch", repo.branch.is_empty()),
    ];
    for (field, missing) in required {
        if missing {
            errors.push(
                ValidationError::new(field, format!("Repository {} cannot be empty", field))
                    .with_repository(&repo.name),
            );
        }
    }

    for (index, filter) in repo.filters.iter().enumerate() {
        if filter.paths.is_empty() || filter.paths.iter().any(|p| p.is_empty()) {
            errors.push(
                ValidationError::new(
                    format!("filters[{}].paths", index),
                    "Filter paths must be non-empty",
                )
                .with_repository(&repo.name),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &GglConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        GglError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathFilter;

    fn config_with(repos: Vec<RepositoryRef>) -> GglConfig {
        let mut config = GglConfig::new("/src");
        for repo in repos {
            config.add_repository(repo);
        }
        config
    }

    #[test]
    fn test_valid_config() {
        let config = config_with(vec![
            RepositoryRef::new("api", "api", "main"),
            RepositoryRef::new("web", "web", "main"),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_repositories_allowed() {
        let config = GglConfig::new("/src");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let config = config_with(vec![
            RepositoryRef::new("api", "api", "main"),
            RepositoryRef::new("api", "api", "release"),
        ]);

        assert!(validate_config(&config).is_ok());
        assert!(validate_config_result(&config).is_ok());
    }

    #[test]
    fn test_empty_fields() {
        let config = config_with(vec![RepositoryRef::new("api", "", "").with_remote("")]);

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["path", "remote", "branch"]);
        assert_eq!(errors[0].repository.as_deref(), Some("api"));
    }

    #[test]
    fn test_empty_filter_paths() {
        let config = config_with(vec![RepositoryRef::new("api", "api", "main")
            .with_filter(PathFilter::include(Vec::<String>::new()))]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "filters[0].paths");
    }

    #[test]
    fn test_validate_config_result_message() {
        let config = config_with(vec![RepositoryRef::new("", "api", "main")]);
        let err = validate_config_result(&config).unwrap_err();
        assert!(err.to_string().contains("Repository name cannot be empty"));
    }
}

//! Configuration system
//!
//! Loads the YAML file describing which repositories to aggregate:
//! - A shared root directory
//! - An ordered list of repositories (path, remote, branch, fetch flag)
//! - Optional per-repository path filters

mod ggl_config;
mod repository;
pub mod validation;

pub use ggl_config::{GglConfig, CONFIG_FILE_NAME, LOCAL_CONFIG_FILE};
pub use repository::{filters_accept, FilterType, PathFilter, RepositoryRef};
pub use validation::{validate_config, validate_config_result, ValidationError};

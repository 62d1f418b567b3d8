//! ggl - Global git log
//!
//! Aggregates commit history across a configured set of independent git
//! repositories into a single log ordered by author time, optionally fetching
//! each repository's remote first. Useful for spotting which of many
//! repositories introduced a change.
//!
//! # Architecture
//!
//! - **config**: YAML repository list and validation
//! - **git**: `GitBackend` seam (libgit2 and in-memory implementations)
//! - **history**: per-repository walk, cutoff, and cross-repository merge
//! - **output**: `git log` style text and JSON rendering
//! - **pipeline**: run driver tying flags, config, history and output together

pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod logging;
pub mod output;
pub mod pipeline;

// Re-exports
pub use error::{GglError, Result};
pub use pipeline::{run, RunOptions};

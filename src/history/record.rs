//! Commit records
//!
//! A [`CommitRecord`] is one commit read from one configured repository,
//! ready to be sorted into the global log and formatted.

use crate::config::RepositoryRef;
use crate::git::{RawCommit, Signature};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

/// One commit in the aggregated log
///
/// Immutable after construction. Ordered globally by author time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    repository: Arc<RepositoryRef>,
    hash: String,
    short_hash: String,
    author: Signature,
    parents: Vec<String>,
    message: String,
}

impl CommitRecord {
    pub fn from_raw(repository: Arc<RepositoryRef>, raw: RawCommit) -> Self {
        Self {
            repository,
            short_hash: raw.id.abbreviated().to_string(),
            hash: raw.id.to_string(),
            author: raw.author,
            parents: raw.parents.into_iter().map(|p| p.to_string()).collect(),
            message: raw.message,
        }
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Hash abbreviated to 9 characters
    pub fn short_hash(&self) -> &str {
        &self.short_hash
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    /// Author time with its recorded offset; the global sort key
    pub fn author_time(&self) -> DateTime<FixedOffset> {
        self.author.when
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.split('\n').next().unwrap_or_default()
    }
}

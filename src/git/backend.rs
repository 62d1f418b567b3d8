//! Git backend abstraction
//!
//! The history pipeline only needs four repository primitives: open, fetch,
//! resolve a revision, and walk history. They sit behind [`GitBackend`] so the
//! pipeline can run against libgit2 or an in-memory double.

use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of hex characters in an abbreviated hash
pub const ABBREV_LEN: usize = 9;

/// Backend errors
///
/// Carries only the backend's own message; callers attach repository context.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    NotARepository(String),

    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Revision(String),

    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Full hex identifier of a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First [`ABBREV_LEN`] characters of the hash
    pub fn abbreviated(&self) -> &str {
        abbreviate(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// Truncate a hash to [`ABBREV_LEN`] characters
pub fn abbreviate(hash: &str) -> &str {
    match hash.char_indices().nth(ABBREV_LEN) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}

/// Author or committer identity with its recorded UTC offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }
}

/// Commit data as read from a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub id: CommitId,
    pub parents: Vec<CommitId>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl RawCommit {
    /// A commit whose author is also its committer
    pub fn new(id: impl Into<String>, author: Signature, message: impl Into<String>) -> Self {
        Self {
            id: CommitId::new(id),
            parents: Vec::new(),
            committer: author.clone(),
            author,
            message: message.into(),
        }
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(CommitId::new).collect();
        self
    }

    pub fn with_committer(mut self, committer: Signature) -> Self {
        self.committer = committer;
        self
    }
}

/// Result of fetching a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing changed on the remote
    AlreadyUpToDate,

    /// Remote-tracking refs were updated
    Updated { refs: usize },
}

impl FetchOutcome {
    /// Progress note printed under the `Fetching` line, if any
    pub fn note(&self) -> Option<&'static str> {
        match self {
            FetchOutcome::AlreadyUpToDate => Some("  already up-to-date"),
            FetchOutcome::Updated { .. } => None,
        }
    }
}

/// Lazy history walk, newest committer time first
pub type CommitIter<'a> = Box<dyn Iterator<Item = BackendResult<RawCommit>> + 'a>;

/// Repository access needed by the history pipeline
pub trait GitBackend {
    /// An open repository
    type Handle;

    /// Open the repository at `path`
    fn open(&self, path: &Path) -> BackendResult<Self::Handle>;

    /// Fetch `remote` using its configured refspecs
    fn fetch(&self, handle: &Self::Handle, remote: &str) -> BackendResult<FetchOutcome>;

    /// Resolve a revision such as `origin/main` to a commit
    fn resolve_revision(&self, handle: &Self::Handle, revision: &str) -> BackendResult<CommitId>;

    /// Walk history reachable from `from` in reverse committer-time order
    fn log_from<'a>(&'a self, handle: &'a Self::Handle, from: &CommitId)
        -> BackendResult<CommitIter<'a>>;

    /// Paths touched by a commit
    fn changed_paths(&self, handle: &Self::Handle, commit: &CommitId) -> BackendResult<Vec<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate() {
        assert_eq!(
            abbreviate("0123456789abcdef0123456789abcdef01234567"),
            "012345678"
        );
        assert_eq!(abbreviate("abc"), "abc");
        assert_eq!(abbreviate(""), "");
    }

    #[test]
    fn test_fetch_outcome_note() {
        assert_eq!(FetchOutcome::AlreadyUpToDate.note(), Some("  already up-to-date"));
        assert_eq!(FetchOutcome::Updated { refs: 2 }.note(), None);
    }

    #[test]
    fn test_commit_id_from_oid() {
        let oid = git2::Oid::from_str("0123456789abcdef0123456789abcdef01234567").unwrap();
        let id = CommitId::from(oid);
        assert_eq!(id.as_str(), "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(id.abbreviated(), "012345678");
    }

    #[test]
    fn test_raw_commit_defaults_committer_to_author() {
        let when = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+02:00").unwrap();
        let commit = RawCommit::new("abc", Signature::new("Ada", "ada@example.com", when), "msg")
            .with_parents(["p1", "p2"]);
        assert_eq!(commit.committer, commit.author);
        assert_eq!(commit.parents.len(), 2);
    }
}

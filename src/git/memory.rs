//! In-memory git backend
//!
//! Serves canned repositories so the history pipeline can be driven without
//! touching disk or network. Every call is recorded for inspection.

use super::backend::{
    BackendError, BackendResult, CommitId, CommitIter, FetchOutcome, GitBackend, RawCommit,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A call made against a [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Open(PathBuf),
    Fetch { path: PathBuf, remote: String },
    Resolve { path: PathBuf, revision: String },
    Log { path: PathBuf, from: CommitId },
}

/// How a repository answers a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchBehavior {
    Succeed(FetchOutcome),
    Fail(String),
}

/// A canned repository
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    refs: HashMap<String, CommitId>,
    commits: Vec<RawCommit>,
    changed: HashMap<CommitId, Vec<PathBuf>>,
    fetch: FetchBehavior,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            refs: HashMap::new(),
            commits: Vec::new(),
            changed: HashMap::new(),
            fetch: FetchBehavior::Succeed(FetchOutcome::AlreadyUpToDate),
        }
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A linear history reachable from `revision`
    ///
    /// `commits` are given newest first; commits without explicit parents are
    /// chained to the next one in the list.
    pub fn linear(revision: &str, commits: Vec<RawCommit>) -> Self {
        let mut repo = Self::new();
        let ids: Vec<CommitId> = commits.iter().map(|c| c.id.clone()).collect();

        for (index, mut commit) in commits.into_iter().enumerate() {
            if commit.parents.is_empty() {
                if let Some(parent) = ids.get(index + 1) {
                    commit.parents.push(parent.clone());
                }
            }
            repo.commits.push(commit);
        }

        if let Some(head) = ids.first() {
            repo.refs.insert(revision.to_string(), head.clone());
        }
        repo
    }

    pub fn with_commit(mut self, commit: RawCommit) -> Self {
        self.commits.push(commit);
        self
    }

    pub fn with_ref(mut self, revision: impl Into<String>, id: impl Into<String>) -> Self {
        self.refs.insert(revision.into(), CommitId::new(id));
        self
    }

    pub fn with_changed_paths<I, P>(mut self, id: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.changed
            .insert(CommitId::new(id), paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_fetch(mut self, fetch: FetchBehavior) -> Self {
        self.fetch = fetch;
        self
    }

    fn find(&self, id: &CommitId) -> Option<&RawCommit> {
        self.commits.iter().find(|c| &c.id == id)
    }

    /// Commits reachable from `from`, newest committer time first
    fn history(&self, from: &CommitId) -> BackendResult<Vec<RawCommit>> {
        let mut seen = HashSet::new();
        let mut stack = vec![from.clone()];
        let mut reachable = Vec::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let commit = self
                .find(&id)
                .ok_or_else(|| BackendError::Other(format!("object not found: {}", id)))?;
            stack.extend(commit.parents.iter().cloned());
            reachable.push(commit.clone());
        }

        reachable.sort_by(|a, b| b.committer.when.cmp(&a.committer.when));
        Ok(reachable)
    }
}

/// Handle to a repository in a [`MemoryBackend`]
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    path: PathBuf,
}

/// [`GitBackend`] serving [`MemoryRepository`] values keyed by path
#[derive(Debug, Default)]
pub struct MemoryBackend {
    repositories: HashMap<PathBuf, MemoryRepository>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, path: impl Into<PathBuf>, repository: MemoryRepository) -> Self {
        self.repositories.insert(path.into(), repository);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Paths passed to `fetch`
    pub fn fetched(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Fetch { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn repository(&self, handle: &MemoryHandle) -> BackendResult<&MemoryRepository> {
        self.repositories.get(&handle.path).ok_or_else(|| {
            BackendError::NotARepository(format!("no repository at {}", handle.path.display()))
        })
    }
}

impl GitBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn open(&self, path: &Path) -> BackendResult<MemoryHandle> {
        self.record(BackendCall::Open(path.to_path_buf()));

        if self.repositories.contains_key(path) {
            Ok(MemoryHandle {
                path: path.to_path_buf(),
            })
        } else {
            Err(BackendError::NotARepository(format!(
                "could not find repository at '{}'",
                path.display()
            )))
        }
    }

    fn fetch(&self, handle: &MemoryHandle, remote: &str) -> BackendResult<FetchOutcome> {
        self.record(BackendCall::Fetch {
            path: handle.path.clone(),
            remote: remote.to_string(),
        });

        match &self.repository(handle)?.fetch {
            FetchBehavior::Succeed(outcome) => Ok(*outcome),
            FetchBehavior::Fail(message) => Err(BackendError::Fetch(message.clone())),
        }
    }

    fn resolve_revision(&self, handle: &MemoryHandle, revision: &str) -> BackendResult<CommitId> {
        self.record(BackendCall::Resolve {
            path: handle.path.clone(),
            revision: revision.to_string(),
        });

        self.repository(handle)?
            .refs
            .get(revision)
            .cloned()
            .ok_or_else(|| BackendError::Revision("reference not found".to_string()))
    }

    fn log_from<'a>(&'a self, handle: &'a MemoryHandle, from: &CommitId) -> BackendResult<CommitIter<'a>> {
        self.record(BackendCall::Log {
            path: handle.path.clone(),
            from: from.clone(),
        });

        let history = self.repository(handle)?.history(from)?;
        Ok(Box::new(history.into_iter().map(Ok)))
    }

    fn changed_paths(&self, handle: &MemoryHandle, commit: &CommitId) -> BackendResult<Vec<PathBuf>> {
        Ok(self
            .repository(handle)?
            .changed
            .get(commit)
            .cloned()
            .unwrap_or_default())
    }
}

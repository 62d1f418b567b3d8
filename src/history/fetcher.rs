//! Per-repository history retrieval
//!
//! Opens one configured repository, optionally fetches its remote, resolves
//! `<remote>/<branch>` and walks history newest-first until the cutoff or the
//! page bound is reached.

use super::cutoff::TimeCutoff;
use super::record::CommitRecord;
use crate::config::{filters_accept, RepositoryRef};
use crate::git::{FetchOutcome, GitBackend};
use crate::{GglError, Result};
use std::path::Path;
use std::sync::Arc;

/// Maximum commits walked per repository
pub const PAGE_SIZE: usize = 1000;

/// Commits read from one repository
#[derive(Debug, Clone)]
pub struct RepositoryLog {
    pub repository: Arc<RepositoryRef>,

    /// Records in committer-time order, newest first
    pub records: Vec<CommitRecord>,

    /// Outcome of the remote fetch, if one was performed
    pub fetch: Option<FetchOutcome>,

    /// The walk stopped at the page bound with in-window history left
    pub truncated: bool,
}

/// Reads one repository's log through a [`GitBackend`]
pub struct RepositoryLogFetcher<'a, B: GitBackend> {
    backend: &'a B,
    root: &'a Path,
    cutoff: TimeCutoff,
    fetch_requested: bool,
    page_size: usize,
}

impl<'a, B: GitBackend> RepositoryLogFetcher<'a, B> {
    pub fn new(backend: &'a B, root: &'a Path, cutoff: TimeCutoff) -> Self {
        Self {
            backend,
            root,
            cutoff,
            fetch_requested: false,
            page_size: PAGE_SIZE,
        }
    }

    /// Fetch remotes of repositories that allow it
    pub fn fetch_requested(mut self, fetch: bool) -> Self {
        self.fetch_requested = fetch;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Read the log of `repository`
    pub fn fetch(&self, repository: &Arc<RepositoryRef>) -> Result<RepositoryLog> {
        let path = repository.location(self.root);
        tracing::debug!(repository = %repository.name, path = %path.display(), "Opening repository");

        let handle = self
            .backend
            .open(&path)
            .map_err(|e| GglError::RepositoryOpen {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let fetch = if self.fetch_requested && repository.fetch {
            Some(self.fetch_remote(&handle, repository)?)
        } else {
            None
        };

        let revision = repository.revision();
        let start = self
            .backend
            .resolve_revision(&handle, &revision)
            .map_err(|e| GglError::RevisionResolution {
                repository: repository.name.clone(),
                revision: revision.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(repository = %repository.name, %revision, start = %start, "Walking history");

        let mut records = Vec::new();
        let mut walked = 0;
        let mut truncated = false;

        for raw in self.backend.log_from(&handle, &start)? {
            let raw = raw?;

            // History is committer-time ordered, so the first commit authored
            // before the cutoff ends the walk
            if !self.cutoff.includes(&raw.author.when) {
                break;
            }

            if walked == self.page_size {
                truncated = true;
                tracing::warn!(
                    repository = %repository.name,
                    page_size = self.page_size,
                    "History truncated at page size; older commits in the window are not shown"
                );
                break;
            }
            walked += 1;

            if !repository.filters.is_empty() {
                let changed = self.backend.changed_paths(&handle, &raw.id)?;
                if !filters_accept(&repository.filters, &changed) {
                    continue;
                }
            }

            records.push(CommitRecord::from_raw(Arc::clone(repository), raw));
        }

        tracing::debug!(
            repository = %repository.name,
            walked,
            included = records.len(),
            "Finished walking history"
        );

        Ok(RepositoryLog {
            repository: Arc::clone(repository),
            records,
            fetch,
            truncated,
        })
    }

    fn fetch_remote(&self, handle: &B::Handle, repository: &RepositoryRef) -> Result<FetchOutcome> {
        eprintln!(
            "Fetching {}: {}/{}",
            repository.name, repository.remote, repository.branch
        );

        let outcome = self
            .backend
            .fetch(handle, &repository.remote)
            .map_err(|e| GglError::Fetch {
                repository: repository.name.clone(),
                remote: repository.remote.clone(),
                message: e.to_string(),
            })?;

        if let Some(note) = outcome.note() {
            eprintln!("{}", note);
        }

        match outcome {
            FetchOutcome::AlreadyUpToDate => {
                tracing::info!(repository = %repository.name, "Remote already up to date");
            }
            FetchOutcome::Updated { refs } => {
                tracing::info!(repository = %repository.name, refs, "Fetched remote");
            }
        }

        Ok(outcome)
    }
}

//! Cross-repository aggregation
//!
//! Reads every configured repository and merges the results into a single
//! log ordered by author time, newest first.

use super::cutoff::TimeCutoff;
use super::fetcher::{RepositoryLog, RepositoryLogFetcher, PAGE_SIZE};
use super::record::CommitRecord;
use crate::config::{GglConfig, RepositoryRef};
use crate::git::GitBackend;
use crate::{GglError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// The globally ordered log of one run
#[derive(Debug, Clone, Default)]
pub struct AggregatedLog {
    /// Records sorted by author time, newest first
    pub records: Vec<CommitRecord>,

    /// Repositories whose walk hit the page bound
    pub truncated: Vec<String>,
}

impl AggregatedLog {
    /// Concatenate per-repository logs (in configuration order) and sort
    pub fn from_logs(logs: Vec<RepositoryLog>) -> Self {
        let mut records = Vec::new();
        let mut truncated = Vec::new();

        for log in logs {
            if log.truncated {
                truncated.push(log.repository.name.clone());
            }
            records.extend(log.records);
        }

        sort_newest_first(&mut records);
        Self { records, truncated }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sort by author time descending
///
/// The sort is stable: records with equal author times keep their input order.
pub fn sort_newest_first(records: &mut [CommitRecord]) {
    records.sort_by(|a, b| b.author_time().cmp(&a.author_time()));
}

/// Runs a [`RepositoryLogFetcher`] over every configured repository
#[derive(Debug, Clone)]
pub struct Aggregator {
    repositories: Vec<Arc<RepositoryRef>>,
    root: PathBuf,
    cutoff: TimeCutoff,
    fetch: bool,
    page_size: usize,
}

impl Aggregator {
    pub fn new(repositories: Vec<RepositoryRef>, root: impl Into<PathBuf>, cutoff: TimeCutoff) -> Self {
        Self {
            repositories: repositories.into_iter().map(Arc::new).collect(),
            root: root.into(),
            cutoff,
            fetch: false,
            page_size: PAGE_SIZE,
        }
    }

    /// Aggregator over every repository in `config`
    pub fn from_config(config: &GglConfig, cutoff: TimeCutoff) -> Self {
        Self::new(config.repositories.clone(), config.root_dir(), cutoff)
    }

    /// Fetch remotes of repositories that allow it
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn fetcher<'a, B: GitBackend>(&'a self, backend: &'a B) -> RepositoryLogFetcher<'a, B> {
        RepositoryLogFetcher::new(backend, &self.root, self.cutoff)
            .fetch_requested(self.fetch)
            .page_size(self.page_size)
    }

    /// Read repositories one after another, in configuration order
    ///
    /// The first failure aborts the run; no partial log is returned.
    pub fn collect<B: GitBackend>(&self, backend: &B) -> Result<AggregatedLog> {
        let fetcher = self.fetcher(backend);
        let mut logs = Vec::with_capacity(self.repositories.len());

        for repository in &self.repositories {
            logs.push(fetcher.fetch(repository)?);
        }

        let log = AggregatedLog::from_logs(logs);
        tracing::info!(
            repositories = self.repositories.len(),
            commits = log.len(),
            "Aggregated history"
        );
        Ok(log)
    }

    /// Read repositories concurrently on blocking tasks
    ///
    /// Results are joined in configuration order, so ordering and error
    /// reporting match [`Aggregator::collect`].
    pub fn collect_concurrent<B>(&self, backend: Arc<B>) -> Result<AggregatedLog>
    where
        B: GitBackend + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("ggl-reader")
            .build()?;

        let joined = runtime.block_on(async {
            let tasks = self.repositories.iter().map(|repository| {
                let backend = Arc::clone(&backend);
                let repository = Arc::clone(repository);
                let root = self.root.clone();
                let (cutoff, fetch, page_size) = (self.cutoff, self.fetch, self.page_size);

                tokio::task::spawn_blocking(move || {
                    RepositoryLogFetcher::new(backend.as_ref(), &root, cutoff)
                        .fetch_requested(fetch)
                        .page_size(page_size)
                        .fetch(&repository)
                })
            });
            futures::future::join_all(tasks).await
        });

        let mut logs = Vec::with_capacity(joined.len());
        for result in joined {
            let log = result
                .map_err(|e| GglError::Other(format!("Repository reader failed: {}", e)))??;
            logs.push(log);
        }

        let log = AggregatedLog::from_logs(logs);
        tracing::info!(
            repositories = self.repositories.len(),
            commits = log.len(),
            "Aggregated history concurrently"
        );
        Ok(log)
    }
}

//! libgit2-backed repository operations

use super::backend::{
    BackendError, BackendResult, CommitId, CommitIter, FetchOutcome, GitBackend, RawCommit,
    Signature,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Cred, CredentialType, FetchOptions, Oid, RemoteCallbacks, Repository, Sort};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Credential attempts before giving up on a remote
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Git credentials configuration
#[derive(Debug, Clone, Default)]
pub struct GitCredentials {
    /// Token for HTTPS remotes
    pub token: Option<String>,

    /// Username for token authentication
    pub username: Option<String>,
}

impl GitCredentials {
    /// Pick up a token from `GGL_GIT_TOKEN` or `GITHUB_TOKEN`
    pub fn from_env() -> Self {
        let token = ["GGL_GIT_TOKEN", "GITHUB_TOKEN"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()));

        if token.is_some() {
            tracing::debug!("Using token from environment for HTTPS remotes");
        }

        Self {
            token,
            username: Some("git".to_string()),
        }
    }

    /// Create callback for git2 authentication
    fn create_callbacks<'a>(&self) -> RemoteCallbacks<'a> {
        let mut callbacks = RemoteCallbacks::new();

        let token = self.token.clone();
        let username = self.username.clone();
        let mut attempts = 0;

        callbacks.credentials(move |url, username_from_url, allowed_types| {
            tracing::debug!(url = url, "Git credentials callback invoked");

            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                if let Some(user) = username_from_url {
                    return Cred::ssh_key_from_agent(user);
                }
            }

            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(ref token) = token {
                    let user = username.as_deref().or(username_from_url).unwrap_or("git");
                    return Cred::userpass_plaintext(user, token);
                }
            }

            Cred::default()
        });

        callbacks
    }
}

/// [`GitBackend`] implemented with libgit2
#[derive(Debug, Clone, Default)]
pub struct Git2Backend {
    credentials: GitCredentials,
}

impl Git2Backend {
    pub fn new() -> Self {
        Self {
            credentials: GitCredentials::from_env(),
        }
    }
}

impl GitBackend for Git2Backend {
    type Handle = Repository;

    fn open(&self, path: &Path) -> BackendResult<Repository> {
        Repository::open(path).map_err(|e| BackendError::NotARepository(e.message().to_string()))
    }

    fn fetch(&self, repo: &Repository, remote_name: &str) -> BackendResult<FetchOutcome> {
        let mut remote = repo
            .find_remote(remote_name)
            .map_err(|e| BackendError::Fetch(e.message().to_string()))?;

        let updated = Cell::new(0usize);

        let mut callbacks = self.credentials.create_callbacks();
        callbacks.update_tips(|refname, old, new| {
            tracing::debug!(refname, %old, %new, "Updated remote-tracking ref");
            updated.set(updated.get() + 1);
            true
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        // Empty refspec list uses the remote's configured refspecs
        remote
            .fetch(&[] as &[&str], Some(&mut fetch_options), None)
            .map_err(|e| BackendError::Fetch(e.message().to_string()))?;

        Ok(match updated.get() {
            0 => FetchOutcome::AlreadyUpToDate,
            refs => FetchOutcome::Updated { refs },
        })
    }

    fn resolve_revision(&self, repo: &Repository, revision: &str) -> BackendResult<CommitId> {
        repo.revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| CommitId::from(commit.id()))
            .map_err(|e| BackendError::Revision(e.message().to_string()))
    }

    fn log_from<'a>(&'a self, repo: &'a Repository, from: &CommitId) -> BackendResult<CommitIter<'a>> {
        let oid = Oid::from_str(from.as_str())?;

        let mut walk = repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        walk.push(oid)?;

        Ok(Box::new(walk.map(move |id| -> BackendResult<RawCommit> {
            let commit = repo.find_commit(id?)?;
            Ok(raw_commit(&commit))
        })))
    }

    fn changed_paths(&self, repo: &Repository, commit: &CommitId) -> BackendResult<Vec<PathBuf>> {
        let commit = repo.find_commit(Oid::from_str(commit.as_str())?)?;

        // Root and merge commits are diffed against the empty tree
        let parent_tree = if commit.parent_count() == 1 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        let tree = commit.tree()?;
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        Ok(diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().map(Path::to_path_buf))
            .collect())
    }
}

fn raw_commit(commit: &git2::Commit<'_>) -> RawCommit {
    RawCommit {
        id: CommitId::from(commit.id()),
        parents: commit.parent_ids().map(CommitId::from).collect(),
        author: signature(&commit.author()),
        committer: signature(&commit.committer()),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
    }
}

fn signature(sig: &git2::Signature<'_>) -> Signature {
    Signature {
        name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
        email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
        when: to_datetime(sig.when()),
    }
}

/// Convert a git timestamp, keeping its recorded offset
pub fn to_datetime(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(time.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit_at(repo: &Repository, seconds: i64, message: &str) -> Oid {
        let sig = git2::Signature::new("Ada", "ada@example.com", &git2::Time::new(seconds, 60))
            .unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_to_datetime_keeps_offset() {
        let when = to_datetime(git2::Time::new(1_700_000_000, -300));
        assert_eq!(when.offset().local_minus_utc(), -300 * 60);
        assert_eq!(when.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_open_not_a_repository() {
        let dir = TempDir::new().unwrap();
        let result = Git2Backend::default().open(dir.path());
        assert!(matches!(result, Err(BackendError::NotARepository(_))));
    }

    #[test]
    fn test_resolve_and_walk() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_at(&repo, 1_000, "first");
        let head = commit_at(&repo, 2_000, "second\n\nbody");
        repo.reference("refs/remotes/origin/main", head, true, "test")
            .unwrap();

        let backend = Git2Backend::default();
        let handle = backend.open(dir.path()).unwrap();
        let start = backend.resolve_revision(&handle, "origin/main").unwrap();
        assert_eq!(start.as_str(), head.to_string());

        let commits: Vec<RawCommit> = backend
            .log_from(&handle, &start)
            .unwrap()
            .collect::<BackendResult<_>>()
            .unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "second\n\nbody");
        assert_eq!(commits[0].parents, vec![commits[1].id.clone()]);
        assert_eq!(commits[0].author.when.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_resolve_missing_revision() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_at(&repo, 1_000, "first");

        let backend = Git2Backend::default();
        let result = backend.resolve_revision(&repo, "origin/main");
        assert!(matches!(result, Err(BackendError::Revision(_))));
    }

    #[test]
    fn test_fetch_unknown_remote() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let result = Git2Backend::default().fetch(&repo, "nope");
        assert!(matches!(result, Err(BackendError::Fetch(_))));
    }
}

//! Git repository access
//!
//! [`GitBackend`] is the seam between the history pipeline and repositories:
//! [`Git2Backend`] reads real repositories through libgit2, [`MemoryBackend`]
//! serves canned histories.

mod backend;
mod memory;
mod operations;

pub use backend::{
    abbreviate, BackendError, BackendResult, CommitId, CommitIter, FetchOutcome, GitBackend,
    RawCommit, Signature, ABBREV_LEN,
};
pub use memory::{BackendCall, FetchBehavior, MemoryBackend, MemoryHandle, MemoryRepository};
pub use operations::{to_datetime, Git2Backend, GitCredentials};

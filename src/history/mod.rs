//! Multi-repository history
//!
//! - **cutoff**: the time window of a run
//! - **record**: one commit from one repository
//! - **fetcher**: bounded, time-limited walk of a single repository
//! - **aggregator**: all repositories merged into one author-time ordered log

mod aggregator;
mod cutoff;
mod fetcher;
mod record;

pub use aggregator::{sort_newest_first, AggregatedLog, Aggregator};
pub use cutoff::{TimeCutoff, DEFAULT_WINDOW_DAYS, UNTIL_FORMAT};
pub use fetcher::{RepositoryLog, RepositoryLogFetcher, PAGE_SIZE};
pub use record::CommitRecord;

//! Run driver
//!
//! Turns command-line options into a finished log: resolve the cutoff, load
//! and validate the configuration, aggregate every repository, then render.
//! Nothing is written until every repository has been read.

use crate::config::{validate_config_result, GglConfig};
use crate::git::{Git2Backend, GitBackend};
use crate::history::{Aggregator, TimeCutoff};
use crate::output::{write_json, write_text, ColorChoice, OutputFormat};
use crate::Result;
use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Options for one run, fixed before any repository is read
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fetch remotes of repositories that allow it
    pub fetch: bool,

    /// Earliest author date, `YYYY-MM-DD`; defaults to a week ago
    pub until: Option<String>,

    /// Explicit config file
    pub config: Option<PathBuf>,

    pub format: OutputFormat,

    pub color: ColorChoice,

    /// Read repositories concurrently
    pub parallel: bool,
}

/// Run against real repositories, printing to stdout
pub fn run(options: &RunOptions) -> Result<()> {
    let cutoff = TimeCutoff::resolve(options.until.as_deref(), Local::now())?;

    let config_path = GglConfig::resolve_path(options.config.as_deref());
    let config = GglConfig::load(&config_path)?;
    validate_config_result(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(options, &config, cutoff, Arc::new(Git2Backend::new()), &mut out)
}

/// Aggregate `config` through `backend` and render to `out`
pub fn execute<B, W>(
    options: &RunOptions,
    config: &GglConfig,
    cutoff: TimeCutoff,
    backend: Arc<B>,
    out: &mut W,
) -> Result<()>
where
    B: GitBackend + Send + Sync + 'static,
    W: Write,
{
    tracing::debug!(
        cutoff = %cutoff.as_datetime(),
        fetch = options.fetch,
        parallel = options.parallel,
        "Starting run"
    );

    let aggregator = Aggregator::from_config(config, cutoff).with_fetch(options.fetch);
    let log = if options.parallel {
        aggregator.collect_concurrent(backend)?
    } else {
        aggregator.collect(backend.as_ref())?
    };

    match options.format {
        OutputFormat::Text => write_text(&log.records, options.color.enabled(), out),
        OutputFormat::Json => write_json(&log.records, out),
    }
}

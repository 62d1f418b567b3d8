//! ggl - Global git log
//!
//! Main entry point for the ggl CLI.

use clap::Parser;
use ggl::output::{ColorChoice, OutputFormat};
use ggl::RunOptions;
use std::path::PathBuf;
use std::process;

/// Show what changed, everywhere, recently
#[derive(Parser, Debug)]
#[command(name = "ggl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Fetch remotes of repositories that allow it before reading history
    #[arg(short, long)]
    fetch: bool,

    /// How far back to go, e.g. 2022-11-01 (default: 7 days ago)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    until: Option<String>,

    /// Path to config file (default: ~/.config/ggl.yaml, then ./config.yaml)
    #[arg(short, long, env = "GGL_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of git log text
    #[arg(short, long)]
    json: bool,

    /// Color the commit header lines
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Read repositories concurrently
    #[arg(short, long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            fetch: cli.fetch,
            until: cli.until,
            config: cli.config,
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            color: cli.color,
            parallel: cli.parallel,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = ggl::logging::init(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = ggl::run(&cli.into()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

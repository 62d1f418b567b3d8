//! Terminal styling utilities
//!
//! Colors are applied on top of already formatted text, so the plain
//! rendering stays byte-for-byte what `format_commit` produced.

use clap::ValueEnum;
use crossterm::style::Stylize;
use std::io::IsTerminal;

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Commit header line (matches `git log`: yellow)
pub fn commit_header(line: &str) -> String {
    line.yellow().to_string()
}

/// Color the first line of a formatted block
pub fn colorize_block(block: &str) -> String {
    match block.split_once('\n') {
        Some((header, rest)) => format!("{}\n{}", commit_header(header), rest),
        None => commit_header(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_only_header() {
        let block = "commit abc\nRepository: api\n";
        let colored = colorize_block(block);
        assert!(colored.ends_with("\nRepository: api\n"));
        assert!(colored.contains("commit abc"));
    }

    #[test]
    fn test_explicit_choices() {
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
    }
}

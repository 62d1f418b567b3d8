//! Output rendering
//!
//! - **text**: `git log` compatible blocks with a repository line
//! - **json**: the same records as a JSON array
//! - **style**: optional terminal colors for text output

pub mod json;
pub mod style;
pub mod text;

pub use json::write_json;
pub use style::{colorize_block, ColorChoice};
pub use text::{format_commit, BODY_INDENT, DATE_FORMAT};

use crate::history::CommitRecord;
use crate::Result;
use std::io::Write;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write every record as a text block followed by a blank line
pub fn write_text<W: Write>(records: &[CommitRecord], color: bool, out: &mut W) -> Result<()> {
    for record in records {
        let block = format_commit(record);
        if color {
            writeln!(out, "{}", colorize_block(&block))?;
        } else {
            writeln!(out, "{}", block)?;
        }
    }
    out.flush()?;
    Ok(())
}

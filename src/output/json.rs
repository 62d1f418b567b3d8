//! JSON rendering of the aggregated log

use crate::history::CommitRecord;
use crate::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct JsonAuthor<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonCommit<'a> {
    repository: &'a str,
    hash: &'a str,
    short_hash: &'a str,
    parents: &'a [String],
    author: JsonAuthor<'a>,
    /// RFC 3339 with the author's offset
    date: String,
    subject: &'a str,
    message: &'a str,
}

impl<'a> From<&'a CommitRecord> for JsonCommit<'a> {
    fn from(record: &'a CommitRecord) -> Self {
        Self {
            repository: &record.repository().name,
            hash: record.hash(),
            short_hash: record.short_hash(),
            parents: record.parents(),
            author: JsonAuthor {
                name: &record.author().name,
                email: &record.author().email,
            },
            date: record.author_time().to_rfc3339(),
            subject: record.subject(),
            message: record.message(),
        }
    }
}

/// Write records as a pretty-printed JSON array followed by a newline
pub fn write_json<W: Write>(records: &[CommitRecord], out: &mut W) -> Result<()> {
    let commits: Vec<JsonCommit<'_>> = records.iter().map(JsonCommit::from).collect();
    serde_json::to_writer_pretty(&mut *out, &commits)?;
    writeln!(out)?;
    Ok(())
}

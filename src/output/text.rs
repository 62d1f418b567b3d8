//! `git log` style text rendering

use crate::history::CommitRecord;
use std::fmt::Write;

/// Author date layout, e.g. `Mon Jan 2 15:04:05 2006 -0700`
pub const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Indentation of message lines, as in `git log`
pub const BODY_INDENT: &str = "    ";

/// Render one commit as a text block ending in exactly one newline
pub fn format_commit(record: &CommitRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "commit {}", record.hash());
    let _ = writeln!(out, "Repository: {}", record.repository().name);

    if record.is_merge() {
        out.push_str("Merge:");
        for parent in record.parents() {
            out.push(' ');
            out.push_str(crate::git::abbreviate(parent));
        }
        out.push('\n');
    }

    let author = record.author();
    let _ = writeln!(out, "Author: {} <{}>", author.name, author.email);
    let _ = writeln!(out, "Date:   {}", author.when.format(DATE_FORMAT));
    out.push('\n');

    for line in record.message().split('\n') {
        out.push_str(BODY_INDENT);
        out.push_str(line);
        out.push('\n');
    }

    let mut block = out.trim().to_string();
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryRef;
    use crate::git::{RawCommit, Signature};
    use chrono::DateTime;
    use std::sync::Arc;

    const HASH: &str = "0123456789abcdef0123456789abcdef01234567";

    fn record(message: &str, parents: &[&str]) -> CommitRecord {
        let when = DateTime::parse_from_rfc3339("2006-01-02T15:04:05-07:00").unwrap();
        let raw = RawCommit::new(HASH, Signature::new("Ada Lovelace", "ada@example.com", when), message)
            .with_parents(parents.iter().copied());
        CommitRecord::from_raw(Arc::new(RepositoryRef::new("engine", "engine", "main")), raw)
    }

    #[test]
    fn test_single_parent_block() {
        let text = format_commit(&record(
            "Fix overflow in parser\n\nThe tokenizer read past the end.\n",
            &["fedcba9876543210fedcba9876543210fedcba98"],
        ));

        let expected = "\
commit 0123456789abcdef0123456789abcdef01234567
Repository: engine
Author: Ada Lovelace <ada@example.com>
Date:   Mon Jan 2 15:04:05 2006 -0700

    Fix overflow in parser
    
    The tokenizer read past the end.
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_merge_line() {
        let text = format_commit(&record(
            "Merge branch 'feature'\n",
            &[
                "1111111111111111111111111111111111111111",
                "2222222222aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "333333333bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            ],
        ));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "Merge: 111111111 222222222 333333333");
        assert!(lines[3].starts_with("Author: "));
    }

    #[test]
    fn test_no_merge_line_for_root_commit() {
        let text = format_commit(&record("Initial commit", &[]));
        assert!(!text.contains("Merge:"));
        assert!(text.ends_with("    Initial commit\n"));
    }

    #[test]
    fn test_positive_offset_and_single_digit_day() {
        let when = DateTime::parse_from_rfc3339("2023-09-05T08:07:06+05:30").unwrap();
        let raw = RawCommit::new(HASH, Signature::new("Dev", "dev@example.com", when), "x");
        let rec = CommitRecord::from_raw(Arc::new(RepositoryRef::new("r", "r", "main")), raw);

        assert!(format_commit(&rec).contains("Date:   Tue Sep 5 08:07:06 2023 +0530\n"));
    }

    #[test]
    fn test_empty_message_trims_to_date() {
        let text = format_commit(&record("", &[]));
        assert!(text.ends_with("-0700\n"));
        assert_eq!(text.matches('\n').count(), 4);
    }

    #[test]
    fn test_deterministic() {
        let rec = record("Same\n\nbody\n", &["aaaaaaaaaa", "bbbbbbbbbb"]);
        assert_eq!(format_commit(&rec), format_commit(&rec));
    }
}

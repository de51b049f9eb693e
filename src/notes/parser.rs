//! Parses the delimited `git log` stream into commit records.
use log::*;

use crate::{
    error::{ReleaseError, Result},
    notes::{commit::CommitRecord, issues::extract_issues},
};

/// Separates the fields of one log entry (ASCII unit separator).
pub const FIELD_SEPARATOR: char = '\x1f';
/// Separates log entries (ASCII record separator).
pub const RECORD_SEPARATOR: char = '\x1e';

/// `git log --pretty` format producing hash, author email, subject and body
/// delimited by the separators above.
pub const LOG_FORMAT: &str = "--pretty=format:%x1e%h%x1f%aE%x1f%s%x1f%b";

/// Split a raw log blob into commit records, preserving log order.
///
/// Entries that do not carry all four fields make the whole parse fail.
pub fn parse_log(raw: &str) -> Result<Vec<CommitRecord>> {
    let trimmed = raw.trim_matches(|c| c == '\n' || c == RECORD_SEPARATOR || c == '\'');

    if trimmed.is_empty() {
        return Ok(vec![]);
    }

    let mut records = vec![];

    for (index, entry) in trimmed.split(RECORD_SEPARATOR).enumerate() {
        let fields = entry.splitn(4, FIELD_SEPARATOR).collect::<Vec<&str>>();

        if fields.len() < 4 || fields[0].trim().is_empty() {
            return Err(ReleaseError::MalformedLogEntry {
                index,
                entry: entry.to_string(),
            });
        }

        let body = fields[3].trim_end_matches('\n').to_string();

        let record = CommitRecord {
            hash: fields[0].trim().to_string(),
            author_email: fields[1].to_string(),
            subject: fields[2].to_string(),
            issues: extract_issues(&body),
            body,
            remote: None,
        };

        debug!("parsed commit {}: {}", record.hash, record.subject);
        records.push(record);
    }

    Ok(records)
}

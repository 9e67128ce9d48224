//! Parser for APT `Packages` indices.
//!
//! An index is a sequence of control records separated by a blank line.
//! Only the fields needed to download and verify a package are kept; every
//! other line is ignored.

use crate::snapshot::PackageEntry;

const PACKAGE: &str = "Package:";
const VERSION: &str = "Version:";
const FILENAME: &str = "Filename:";
const SHA256: &str = "SHA256:";

const SEPARATOR: &str = ": ";

/// Errors that can occur while parsing an index.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("malformed field at line {line}: {content:?}")]
    MalformedField { line: usize, content: String },
}

/// Parse an index blob into package entries, in source order.
///
/// `url_prefix` is joined with each record's relative `Filename` to build
/// the entry's download URL. Missing fields become empty strings. A known
/// field that lacks the `": "` separator fails the whole parse.
pub fn parse(url_prefix: &str, index: &str) -> Result<Vec<PackageEntry>, IndexError> {
    let mut entries = Vec::new();
    let mut line_number = 1;

    for record in index.split("\n\n") {
        let first_line = line_number;
        line_number += record.matches('\n').count() + 2;

        if record.trim().is_empty() {
            continue;
        }

        entries.push(parse_record(url_prefix, record, first_line)?);
    }

    Ok(entries)
}

fn parse_record(
    url_prefix: &str,
    record: &str,
    first_line: usize,
) -> Result<PackageEntry, IndexError> {
    let mut entry = PackageEntry {
        name: String::new(),
        version: String::new(),
        url: String::new(),
        sha256: String::new(),
    };

    for (offset, line) in record.lines().enumerate() {
        let field = if line.starts_with(PACKAGE) {
            &mut entry.name
        } else if line.starts_with(VERSION) {
            &mut entry.version
        } else if line.starts_with(FILENAME) {
            &mut entry.url
        } else if line.starts_with(SHA256) {
            &mut entry.sha256
        } else {
            continue;
        };

        let Some((_, value)) = line.split_once(SEPARATOR) else {
            return Err(IndexError::MalformedField {
                line: first_line + offset,
                content: line.to_owned(),
            });
        };

        *field = value.to_owned();
    }

    if !entry.url.is_empty() {
        entry.url = format!("{url_prefix}/{}", entry.url);
    }

    Ok(entry)
}

//! Upstream status document parsing.
//!
//! The document is one backend per line, comma separated:
//!
//! ```text
//! index,upstream,name,status,rise,fall,type,port
//! 0,us1,10.1.0.1:80,up,8247,0,tcp,0
//! ```
//!
//! Parsing never aborts on a bad line. Each field that fails is reported as a
//! [`RecordError`] next to whatever the rest of the document produced.

use std::collections::BTreeMap;
use std::num::ParseIntError;
use thiserror::Error;

/// Fields up to and including `fall` must be present.
const REQUIRED_FIELDS: usize = 6;

/// Identity of one backend row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackendKey {
    pub upstream: String,
    pub name: String,
    pub status: String,
}

impl BackendKey {
    /// Label values in the order of the published label names.
    pub fn label_values(&self) -> [&str; 3] {
        [&self.upstream, &self.name, &self.status]
    }
}

/// Counts parsed for one backend. `None` means not published this pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendCounts {
    pub raise: Option<u64>,
    pub fail: Option<u64>,
}

/// Which count a parse failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Raise,
    Fail,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Raise, Field::Fail];

    /// Label value used by the scrape error counter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Raise => "raise",
            Field::Fail => "fail",
        }
    }
}

/// A line or field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("line {line}: expected at least {} fields, found {found}", REQUIRED_FIELDS)]
    Malformed { line: usize, found: usize },

    #[error("line {line}: invalid {} count {raw:?}: {source}", .field.as_str())]
    InvalidCount {
        line: usize,
        field: Field,
        raw: String,
        source: ParseIntError,
    },
}

impl RecordError {
    /// Error category this failure is counted under.
    pub fn field(&self) -> Field {
        match self {
            // A short line never yields a rise count.
            RecordError::Malformed { .. } => Field::Raise,
            RecordError::InvalidCount { field, .. } => *field,
        }
    }
}

/// Result of parsing one status document.
#[derive(Debug, Default)]
pub struct StatusReport {
    pub backends: BTreeMap<BackendKey, BackendCounts>,
    pub errors: Vec<RecordError>,
}

impl StatusReport {
    /// Number of errors attributed to `field`.
    pub fn error_count(&self, field: Field) -> u64 {
        self.errors.iter().filter(|e| e.field() == field).count() as u64
    }
}

/// Parse a full status document.
pub fn parse_status(body: &str) -> StatusReport {
    let mut report = StatusReport::default();

    for (idx, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let cols: Vec<&str> = line.split(',').collect();
        if cols.len() < REQUIRED_FIELDS {
            report.errors.push(RecordError::Malformed {
                line: line_no,
                found: cols.len(),
            });
            continue;
        }

        let key = BackendKey {
            upstream: cols[1].to_string(),
            name: cols[2].to_string(),
            status: cols[3].to_string(),
        };

        let raise = match parse_count(line_no, Field::Raise, cols[4]) {
            Ok(v) => Some(v),
            Err(e) => {
                report.errors.push(e);
                None
            }
        };

        // Zero means no failures observed and is left unpublished.
        let fail = match parse_count(line_no, Field::Fail, cols[5]) {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(e) => {
                report.errors.push(e);
                None
            }
        };

        if raise.is_some() || fail.is_some() {
            report.backends.insert(key, BackendCounts { raise, fail });
        } else {
            report.backends.remove(&key);
        }
    }

    report
}

fn parse_count(line: usize, field: Field, raw: &str) -> Result<u64, RecordError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|source| RecordError::InvalidCount {
            line,
            field,
            raw: raw.to_string(),
            source,
        })
}

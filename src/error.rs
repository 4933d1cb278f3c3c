//! Module defining the errors which are exposed to the users of the crate

use std::path::PathBuf;

use crate::domain::RecordKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opening, reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from a non-file source failed
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// A line was rejected by the parser
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// A report could not be encoded
    #[error("report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The input directory could not be watched
    #[error("watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Reason why a single line was rejected. Line failures never abort the processing of a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line does not have the `CCCçF1çF2çF3` shape
    #[error("invalid line shape")]
    InvalidShape,

    /// The three-digit code does not identify a record kind
    #[error("unknown code: {0:03}")]
    UnknownCode(u16),

    /// The line has a known code but its fields violate the grammar of that kind
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: RecordKind, reason: String },
}

pub(crate) fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
    Error::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn line_error(line: usize, source: ParseError) -> Error {
    Error::Line { line, source }
}

pub(crate) fn invalid_record(kind: RecordKind, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidRecord {
        kind,
        reason: reason.into(),
    }
}

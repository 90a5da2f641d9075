use std::io;

use rollgraph_core::EventError;
use thiserror::Error;

/// Why a single input line was rejected.
///
/// Every variant is recoverable: the offending line is skipped.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RecordError {
    #[error("line is {length} bytes long, limit is {limit}")]
    LineTooLong { length: usize, limit: usize },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("line is not a JSON object")]
    NotAnObject,
    #[error("malformed record: {reason}")]
    Malformed { reason: String },
    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp { value: String, reason: String },
    #[error(transparent)]
    Event(#[from] EventError),
}

/// Failure of the underlying reader; ends the stream.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

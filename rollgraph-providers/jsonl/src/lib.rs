//! JSON-lines provider turning payment records into validated
//! [`rollgraph_core::TransactionEvent`]s.
//!
//! Each line holds one object with exactly the string fields `created_time`,
//! `actor`, and `target`. Malformed lines are reported as
//! [`Record::Skipped`] rather than aborting the stream.

mod errors;
mod reader;
mod record;
mod timestamp;

pub use errors::{ReaderError, RecordError};
pub use reader::{MAX_LINE_BYTES, Record, TransactionReader};
pub use record::{normalize_identifier, parse_record};
pub use timestamp::{UtcSecond, parse_timestamp};

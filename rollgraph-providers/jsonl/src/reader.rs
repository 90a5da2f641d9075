//! Streaming reader over JSON-lines input.

use std::io::BufRead;

use rollgraph_core::TransactionEvent;

use crate::{ReaderError, RecordError, parse_record};

/// Longest accepted line in bytes, excluding the line terminator.
pub const MAX_LINE_BYTES: usize = 2048;

/// One non-blank input line, either parsed or rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Record {
    /// The line held a valid transaction.
    Event(TransactionEvent),
    /// The line was rejected and should be skipped.
    Skipped {
        /// One-based line number.
        line: usize,
        /// Why the line was rejected.
        error: RecordError,
    },
}

/// Iterates over the records of a JSON-lines stream.
///
/// Blank lines are passed over silently. An I/O failure is yielded once and
/// ends the iteration.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use rollgraph_providers_jsonl::{Record, TransactionReader};
///
/// let input = concat!(
///     r#"{"created_time": "2016-03-28T23:23:12Z", "actor": "a", "target": "b"}"#,
///     "\n\nnot json\n",
/// );
/// let records: Vec<Record> = TransactionReader::new(Cursor::new(input))
///     .collect::<Result<_, _>>()
///     .expect("in-memory reads cannot fail");
/// assert!(matches!(records[0], Record::Event(_)));
/// assert!(matches!(records[1], Record::Skipped { line: 3, .. }));
/// ```
pub struct TransactionReader<R> {
    reader: R,
    line: usize,
    buffer: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> TransactionReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: Vec::new(),
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn classify(&self) -> Option<Record> {
        let content = trim_line_ending(&self.buffer);
        if content.len() > MAX_LINE_BYTES {
            return Some(self.skip(RecordError::LineTooLong {
                length: content.len(),
                limit: MAX_LINE_BYTES,
            }));
        }
        let Ok(text) = std::str::from_utf8(content) else {
            return Some(self.skip(RecordError::InvalidUtf8));
        };
        if text.trim().is_empty() {
            return None;
        }
        Some(match parse_record(text) {
            Ok(event) => Record::Event(event),
            Err(error) => self.skip(error),
        })
    }

    fn skip(&self, error: RecordError) -> Record {
        Record::Skipped {
            line: self.line,
            error,
        }
    }
}

impl<R: BufRead> Iterator for TransactionReader<R> {
    type Item = Result<Record, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(source) => {
                    self.failed = true;
                    return Some(Err(ReaderError::Io {
                        line: self.line + 1,
                        source,
                    }));
                }
            }
            if let Some(record) = self.classify() {
                return Some(Ok(record));
            }
        }
    }
}

fn trim_line_ending(bytes: &[u8]) -> &[u8] {
    let without_lf = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    without_lf.strip_suffix(b"\r").unwrap_or(without_lf)
}

//! Integration tests covering the JSON-lines [`TransactionReader`].
use std::io::{self, BufRead, Cursor, Read};

use rollgraph_providers_jsonl::{
    MAX_LINE_BYTES, ReaderError, Record, RecordError, TransactionReader,
};
use rstest::rstest;

fn line(time: &str, actor: &str, target: &str) -> String {
    format!(r#"{{"created_time": "{time}", "actor": "{actor}", "target": "{target}"}}"#)
}

fn collect(input: &str) -> Vec<Record> {
    TransactionReader::new(Cursor::new(input.to_owned()))
        .collect::<Result<_, _>>()
        .expect("in-memory reads must succeed")
}

#[rstest]
fn reads_events_in_order() {
    let input = [
        line("2016-03-28T23:23:12Z", "Jordan-Gruber", "Jamie-Korn"),
        line("2016-03-28T23:23:13Z", "Maryann-Berry", "Jamie-Korn"),
    ]
    .join("\n");
    let records = collect(&input);
    let times: Vec<i64> = records
        .iter()
        .map(|record| match record {
            Record::Event(event) => event.event_time(),
            Record::Skipped { error, .. } => panic!("unexpected skip: {error}"),
        })
        .collect();
    assert_eq!(times, [1_459_207_392, 1_459_207_393]);
}

#[rstest]
fn skips_bad_lines_with_their_numbers() {
    let input = format!(
        "{}\n\n{{\"actor\": \"a\"}}\n   \n{}\r\n[1, 2]\n",
        line("2016-03-28T23:23:12Z", "a", "b"),
        line("2016-03-28T23:23:14Z", "b", "c"),
    );
    let records = collect(&input);
    let lines: Vec<Option<usize>> = records
        .iter()
        .map(|record| match record {
            Record::Event(_) => None,
            Record::Skipped { line, .. } => Some(*line),
        })
        .collect();
    assert_eq!(lines, [None, Some(3), None, Some(6)]);
}

#[rstest]
#[case::at_limit(MAX_LINE_BYTES, false)]
#[case::over_limit(MAX_LINE_BYTES + 1, true)]
fn enforces_line_length_limit(#[case] length: usize, #[case] rejected: bool) {
    let base = line("2016-03-28T23:23:12Z", "a", "b");
    let padding = " ".repeat(length - base.len());
    let padded = format!("{padding}{base}\n");
    let records = collect(&padded);
    assert_eq!(records.len(), 1);
    let record = records.first().expect("one record");
    assert_eq!(
        matches!(
            record,
            Record::Skipped {
                error: RecordError::LineTooLong { .. },
                ..
            }
        ),
        rejected
    );
}

#[rstest]
fn invalid_utf8_is_skipped() {
    let mut bytes = line("2016-03-28T23:23:12Z", "a", "b").into_bytes();
    bytes.extend_from_slice(b"\n\xff\xfe\n");
    let records: Vec<Record> = TransactionReader::new(Cursor::new(bytes))
        .collect::<Result<_, _>>()
        .expect("in-memory reads must succeed");
    assert!(matches!(records.first(), Some(Record::Event(_))));
    assert_eq!(
        records.get(1),
        Some(&Record::Skipped {
            line: 2,
            error: RecordError::InvalidUtf8
        })
    );
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.served {
            return Err(io::Error::other("disk on fire"));
        }
        Ok(b"\n")
    }

    fn consume(&mut self, _amount: usize) {
        self.served = true;
    }
}

#[rstest]
fn io_failure_ends_the_stream() {
    let mut reader = TransactionReader::new(FailingReader { served: false });
    let first = reader.next().expect("one item");
    let err = first.expect_err("read must fail");
    assert!(matches!(err, ReaderError::Io { line: 2, .. }));
    assert!(reader.next().is_none());
    assert_eq!(reader.lines_read(), 1);
}

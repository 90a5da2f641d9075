//! UTC timestamp parsing for `created_time` values.

use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::RecordError;

const LAYOUT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const LAYOUT_LEN: usize = "YYYY-MM-DDTHH:MM:SSZ".len();

/// Byte range of the seconds field within [`LAYOUT`].
const SECONDS: std::ops::Range<usize> = 17..19;

/// A parsed timestamp at whole-second resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UtcSecond {
    /// Seconds since the Unix epoch.
    pub epoch_seconds: i64,
    /// Second-of-minute, `0..60`.
    pub second_of_minute: u8,
}

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` timestamp.
///
/// Spaces and tabs anywhere in `raw` are ignored. A leap second (`:60`) is
/// read as second 59 of the same minute.
///
/// # Errors
/// Returns [`RecordError::InvalidTimestamp`] when the compacted value is not
/// exactly twenty ASCII characters or does not name a real calendar instant.
///
/// # Examples
/// ```
/// use rollgraph_providers_jsonl::parse_timestamp;
///
/// let parsed = parse_timestamp(" 2016-03-28T23:23:12Z ")?;
/// assert_eq!(parsed.epoch_seconds, 1_459_207_392);
/// assert_eq!(parsed.second_of_minute, 12);
/// # Ok::<(), rollgraph_providers_jsonl::RecordError>(())
/// ```
pub fn parse_timestamp(raw: &str) -> Result<UtcSecond, RecordError> {
    let mut compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '\t')).collect();
    let invalid = |reason: &str| RecordError::InvalidTimestamp {
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };
    if compact.len() != LAYOUT_LEN || !compact.is_ascii() {
        return Err(invalid("expected YYYY-MM-DDTHH:MM:SSZ"));
    }
    if compact.get(SECONDS) == Some("60") {
        compact.replace_range(SECONDS, "59");
    }
    let parsed = PrimitiveDateTime::parse(&compact, LAYOUT)
        .map_err(|err| invalid(&err.to_string()))?
        .assume_utc();
    Ok(UtcSecond {
        epoch_seconds: parsed.unix_timestamp(),
        second_of_minute: parsed.second(),
    })
}

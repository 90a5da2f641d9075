//! Parsing of a single JSON-lines record.

use rollgraph_core::TransactionEvent;
use serde::Deserialize;

use crate::{RecordError, timestamp::parse_timestamp};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    created_time: String,
    actor: String,
    target: String,
}

/// Trims `raw` and collapses internal runs of spaces and tabs to one space.
///
/// # Examples
/// ```
/// use rollgraph_providers_jsonl::normalize_identifier;
///
/// assert_eq!(normalize_identifier("  Jamie \t Korn "), "Jamie Korn");
/// assert_eq!(normalize_identifier(" \t "), "");
/// ```
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    raw.split([' ', '\t'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses one line into a validated event.
///
/// # Errors
/// Returns [`RecordError::NotAnObject`] when the line is not a JSON object,
/// [`RecordError::Malformed`] when a field is missing, duplicated, unknown, or
/// not a string, [`RecordError::InvalidTimestamp`] when `created_time` does
/// not parse, and [`RecordError::Event`] when an identifier is blank.
///
/// # Examples
/// ```
/// use rollgraph_providers_jsonl::parse_record;
///
/// let event = parse_record(
///     r#"{"created_time": "2016-03-28T23:23:12Z", "target": "Raffi", "actor": "Amber"}"#,
/// )?;
/// assert_eq!(event.actor(), "Amber");
/// assert_eq!(event.target(), "Raffi");
/// assert_eq!(event.second(), 12);
/// # Ok::<(), rollgraph_providers_jsonl::RecordError>(())
/// ```
pub fn parse_record(line: &str) -> Result<TransactionEvent, RecordError> {
    if !line.trim_start().starts_with('{') {
        return Err(RecordError::NotAnObject);
    }
    let raw: RawRecord = serde_json::from_str(line).map_err(|err| RecordError::Malformed {
        reason: err.to_string(),
    })?;
    let stamp = parse_timestamp(&raw.created_time)?;
    let event = TransactionEvent::new(
        normalize_identifier(&raw.actor),
        normalize_identifier(&raw.target),
        stamp.epoch_seconds,
        u32::from(stamp.second_of_minute),
    )?;
    Ok(event)
}

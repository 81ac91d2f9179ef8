//! # Raw record parser.
//!
//! Turns one raw log record into a [`Message`].
//!
//! ## Record format
//! ```text
//! <timestamp>\t<level>\t<location>\t<text>[\t<payload>]
//!
//! timestamp := YYYY-MM-DDTHH:MM:SS.mmm(Z|±hhmm)
//! ```
//!
//! ## Rules
//! - Leading/trailing whitespace of the whole record is trimmed before splitting.
//! - The record is split on **every** tab; exactly 4 or 5 fields are accepted.
//!   A tab inside the payload therefore makes the record malformed.
//! - The timestamp requires exactly three fraction digits and an explicit zone
//!   (`Z` or a colon-less `±hhmm` offset).
//! - Pure: no I/O, no shared state; safe to call from any number of tasks.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, TimeZone};

use super::record::Message;
use crate::error::SinkError;

/// Field separator inside a record.
pub const FIELD_SEPARATOR: char = '\t';

/// Local part of the timestamp, e.g. `2020-05-01T10:00:00.000`.
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const LOCAL_SHAPE: &[u8; 23] = b"0000-00-00T00:00:00.000";

/// Pluggable record converter used by [`LogSink`](crate::LogSink).
///
/// The default is [`parse_record`].
pub type Converter = Arc<dyn Fn(&[u8]) -> Result<Message, SinkError> + Send + Sync>;

/// Parses one raw record into a [`Message`].
///
/// # Errors
/// - [`SinkError::MalformedRecord`] if the record does not split into 4 or 5 fields
/// - [`SinkError::InvalidTimestamp`] if the first field is not a valid timestamp
///
/// # Example
/// ```
/// use logfan::parse_record;
///
/// let msg = parse_record(b"2020-05-01T10:00:00.000Z\terror\tmain.go:42\tsomething failed").unwrap();
/// assert_eq!(msg.date(), 1_588_327_200);
/// assert_eq!(msg.level(), "error");
/// assert_eq!(msg.payload(), None);
/// ```
pub fn parse_record(raw: &[u8]) -> Result<Message, SinkError> {
    let record = String::from_utf8_lossy(raw);
    let fields: Vec<&str> = record.trim().split(FIELD_SEPARATOR).collect();

    if !(4..=5).contains(&fields.len()) {
        return Err(SinkError::MalformedRecord {
            fields: fields.len(),
        });
    }

    let date = parse_timestamp(fields[0])?;
    let msg = Message::new(date, fields[1], fields[2], fields[3]);

    Ok(match fields.get(4) {
        Some(payload) => msg.with_payload(*payload),
        None => msg,
    })
}

/// Parses a strict `YYYY-MM-DDTHH:MM:SS.mmm(Z|±hhmm)` timestamp into epoch seconds.
fn parse_timestamp(value: &str) -> Result<i64, SinkError> {
    let invalid = |reason: &str| SinkError::InvalidTimestamp {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if !value.is_ascii() || value.len() <= LOCAL_SHAPE.len() {
        return Err(invalid("unexpected length"));
    }
    let (local, zone) = value.split_at(LOCAL_SHAPE.len());

    let shape_ok = local
        .bytes()
        .zip(LOCAL_SHAPE.iter())
        .all(|(b, &want)| match want {
            b'0' => b.is_ascii_digit(),
            _ => b == want,
        });
    if !shape_ok {
        return Err(invalid("expected YYYY-MM-DDTHH:MM:SS.mmm"));
    }

    // chrono's %S accepts 60 as a leap second.
    if &local[17..19] > "59" {
        return Err(invalid("second out of range"));
    }

    let offset = parse_offset(zone).ok_or_else(|| invalid("expected Z or ±hhmm offset"))?;
    let naive = NaiveDateTime::parse_from_str(local, LOCAL_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| invalid("ambiguous local time"))
}

/// `Z` or `±hhmm`.
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    if zone == "Z" {
        return FixedOffset::east_opt(0);
    }

    let bytes = zone.as_bytes();
    if bytes.len() != 5 || !bytes[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = zone[1..3].parse().ok()?;
    let minutes: i32 = zone[3..5].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

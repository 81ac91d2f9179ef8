//! Error types produced by the log sink.
//!
//! [`SinkError`] covers both record parsing failures (returned from
//! [`LogSink::ingest`](crate::LogSink::ingest)) and the reserved shutdown
//! failure mode of [`LogSink::close`](crate::LogSink::close).
//!
//! Like the rest of the crate, errors provide helper methods (`as_label`,
//! `as_message`) for logs/metrics.

use thiserror::Error;

/// # Errors produced by the log sink.
///
/// Parse errors are **non-fatal**: the offending record is dropped from the
/// fan-out and the caller decides whether to log, count or ignore the error.
/// A full listener queue is never reported as an error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Record did not split into 4 or 5 tab-separated fields.
    #[error("unknown log message format: expected 4 or 5 fields, got {fields}")]
    MalformedRecord {
        /// Number of fields the record split into.
        fields: usize,
    },

    /// First field is not a `YYYY-MM-DDTHH:MM:SS.mmm(Z|±hhmm)` timestamp.
    #[error("invalid log timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected timestamp text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Reserved for failures while closing listeners; never produced today.
    #[error("sink shutdown failed: {reason}")]
    Shutdown {
        /// The underlying failure.
        reason: String,
    },
}

impl SinkError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use logfan::SinkError;
    ///
    /// let err = SinkError::MalformedRecord { fields: 1 };
    /// assert_eq!(err.as_label(), "sink_malformed_record");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SinkError::MalformedRecord { .. } => "sink_malformed_record",
            SinkError::InvalidTimestamp { .. } => "sink_invalid_timestamp",
            SinkError::Shutdown { .. } => "sink_shutdown",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SinkError::MalformedRecord { fields } => format!("malformed record: fields={fields}"),
            SinkError::InvalidTimestamp { value, reason } => {
                format!("invalid timestamp: value={value:?} reason={reason}")
            }
            SinkError::Shutdown { reason } => format!("shutdown: {reason}"),
        }
    }

    /// Indicates whether the error came from parsing a record.
    ///
    /// Parse errors mean the record was dropped; the sink itself is unaffected.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SinkError::MalformedRecord { .. } | SinkError::InvalidTimestamp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            SinkError::InvalidTimestamp {
                value: "x".into(),
                reason: "y".into()
            }
            .as_label(),
            "sink_invalid_timestamp"
        );
        assert_eq!(
            SinkError::Shutdown { reason: "z".into() }.as_label(),
            "sink_shutdown"
        );
    }

    #[test]
    fn test_parse_error_classification() {
        assert!(SinkError::MalformedRecord { fields: 3 }.is_parse_error());
        assert!(!SinkError::Shutdown { reason: "z".into() }.is_parse_error());
    }

    #[test]
    fn test_display_mentions_field_count() {
        let err = SinkError::MalformedRecord { fields: 6 };
        assert!(err.to_string().contains("got 6"));
    }
}

//! # Structured log message.
//!
//! [`Message`] is the parsed form of one raw log record. It is produced by a
//! converter (by default [`parse_record`](crate::parse_record)) and then shared
//! read-only with every listener.
//!
//! ## Example
//! ```rust
//! use logfan::Message;
//!
//! let msg = Message::new(1_588_327_200, "error", "main.go:42", "something failed")
//!     .with_payload(r#"{"pod":"web-0"}"#);
//!
//! assert_eq!(msg.level(), "error");
//! assert_eq!(msg.payload(), Some(r#"{"pod":"web-0"}"#));
//! ```

use chrono::{DateTime, Utc};

/// One parsed log record.
///
/// - `date`: seconds since the Unix epoch
/// - `level`, `location`, `text`: carried verbatim from the record
/// - `payload`: optional structured payload (usually JSON), carried verbatim
///
/// Fields are private; a message never changes after the converter builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    #[cfg_attr(feature = "serde", serde(rename = "Date"))]
    date: i64,
    #[cfg_attr(feature = "serde", serde(rename = "LogLevel"))]
    level: String,
    #[cfg_attr(feature = "serde", serde(rename = "Location"))]
    location: String,
    #[cfg_attr(feature = "serde", serde(rename = "Text"))]
    text: String,
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "JSON",
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "empty_as_none"
        )
    )]
    payload: Option<String>,
}

impl Message {
    /// Creates a message without a structured payload.
    pub fn new(
        date: i64,
        level: impl Into<String>,
        location: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            date,
            level: level.into(),
            location: location.into(),
            text: text.into(),
            payload: None,
        }
    }

    /// Attaches a structured payload.
    #[inline]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Seconds since the Unix epoch.
    #[inline]
    pub fn date(&self) -> i64 {
        self.date
    }

    /// Timestamp as a UTC datetime, `None` if out of chrono's range.
    pub fn at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    #[inline]
    pub fn level(&self) -> &str {
        &self.level
    }

    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

#[cfg(feature = "serde")]
fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = serde::Deserialize::deserialize(de)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_converts_epoch_seconds() {
        let msg = Message::new(1_588_327_200, "info", "a.rs:1", "hi");
        let at = msg.at().unwrap();
        assert_eq!(at.to_rfc3339(), "2020-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_payload_absent_by_default() {
        let msg = Message::new(0, "info", "a.rs:1", "hi");
        assert_eq!(msg.payload(), None);
        assert_eq!(msg.clone().with_payload("{}").payload(), Some("{}"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_field_names() {
        let msg = Message::new(7, "warn", "b.rs:2", "careful").with_payload("{\"k\":1}");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["Date"], 7);
        assert_eq!(v["LogLevel"], "warn");
        assert_eq!(v["Location"], "b.rs:2");
        assert_eq!(v["Text"], "careful");
        assert_eq!(v["JSON"], "{\"k\":1}");

        let bare = Message::new(7, "warn", "b.rs:2", "careful");
        let v = serde_json::to_value(&bare).unwrap();
        assert!(v.get("JSON").is_none());

        let back: Message = serde_json::from_str(
            r#"{"Date":7,"LogLevel":"warn","Location":"b.rs:2","Text":"careful","JSON":""}"#,
        )
        .unwrap();
        assert_eq!(back, bare);
    }
}

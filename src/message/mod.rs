//! Log messages: data model and record parser.
//!
//! ## Contents
//! - [`Message`] parsed, immutable log message
//! - [`parse_record`] default converter from raw record bytes
//! - [`Converter`] pluggable converter type accepted by the sink builder

mod parser;
mod record;

pub use parser::{Converter, FIELD_SEPARATOR, parse_record};
pub use record::Message;

//! # Callback-style consumers of a log sink.
//!
//! This module provides the [`Subscribe`] trait and the [`Attachment`] handle
//! returned by [`LogSink::attach`](crate::LogSink::attach).
//!
//! ## Architecture
//! ```text
//! LogSink::attach(sub)
//!     │
//!     ├──► listen() ──► [queue] ──► worker ──► sub.on_message(&Message)
//!     │
//!     └──► Attachment ──► detach() ──► cancel listener ──► worker drains, exits
//! ```

mod attachment;
mod subscriber;

pub use attachment::Attachment;
pub use subscriber::Subscribe;

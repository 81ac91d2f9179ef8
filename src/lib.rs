//! # logfan
//!
//! **logfan** is a concurrent log fan-out sink for Rust.
//!
//! A single writer path ingests raw, tab-separated log records, parses each one
//! into a structured [`Message`], and broadcasts it to any number of independent
//! listeners. Every listener reads from its own bounded queue at its own pace;
//! listeners can join and leave at any time while the producer keeps writing.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!              logging backend (producer)
//!                         │ raw bytes
//!                         ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  LogSink                                                          │
//! │  - Converter (parse_record by default)                            │
//! │  - Registry  (RwLock<HashMap<ListenerId, queue sender>>)          │
//! │  - SinkConfig (queue capacity, DeliveryPolicy)                    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!   [queue 1]          [queue 2]          [queue N]       [queue M]
//!   (bounded)          (bounded)          (bounded)       (bounded)
//!        ▼                  ▼                  ▼               ▼
//!   Listener 1         Listener 2         Listener N      Attachment
//!   (UI panel)        (exporter)         (test harness)  (worker ──► Subscribe)
//! ```
//!
//! ### Locking
//! ```text
//! ingest  ──► parse ──► read lock  ──► send to every queue (per DeliveryPolicy)
//! listen  ──────────►   write lock ──► insert entry
//! cancel  ──────────►   write lock ──► remove entry (queue closed)
//! close   ──────────►   write lock ──► remove all entries (queues closed)
//! ```
//!
//! ## Features
//! | Area              | Description                                                | Key types                               |
//! |-------------------|------------------------------------------------------------|-----------------------------------------|
//! | **Ingest**        | Parse raw records and broadcast them.                      | [`LogSink`], [`parse_record`]           |
//! | **Listening**     | Private bounded queue per listener, idempotent cancel.     | [`Listener`], [`ListenCancel`]          |
//! | **Subscribers**   | Callback consumers on dedicated worker tasks.              | [`Subscribe`], [`Attachment`]           |
//! | **Policies**      | Block or drop when a listener queue is full.               | [`DeliveryPolicy`]                      |
//! | **Errors**        | Typed parse errors.                                        | [`SinkError`]                           |
//! | **Configuration** | Queue capacity, delivery policy, custom converter.         | [`SinkConfig`], [`LogSinkBuilder`]      |
//!
//! ## Optional features
//! - `serde`: derives `Serialize`/`Deserialize` for [`Message`].
//!
//! ## Example
//! ```rust
//! use logfan::LogSink;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = LogSink::new();
//!     let (mut listener, cancel) = sink.listen().await;
//!
//!     sink.ingest(b"2020-05-01T10:00:00.000Z\terror\tmain.go:42\tsomething failed").await?;
//!     assert!(sink.ingest(b"garbage").await.is_err());
//!
//!     let msg = listener.recv().await.expect("listener is active");
//!     assert_eq!(msg.text(), "something failed");
//!
//!     cancel.cancel().await;
//!     assert!(listener.recv().await.is_none());
//!
//!     sink.close().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod message;
mod policies;
mod sink;
mod subscribers;

// ---- Public re-exports ----

pub use error::SinkError;
pub use message::{Converter, FIELD_SEPARATOR, Message, parse_record};
pub use policies::DeliveryPolicy;
pub use sink::{
    DEFAULT_QUEUE_CAPACITY, ListenCancel, Listener, ListenerId, LogSink, LogSinkBuilder, SinkConfig,
};
pub use subscribers::{Attachment, Subscribe};

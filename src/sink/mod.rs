//! Log sink: registry, listeners and the sink facade.
//!
//! Internal modules:
//! - [`registry`]: listener map behind a reader/writer lock;
//! - [`listener`]: receive handle and idempotent cancel handle;
//! - [`log_sink`]: `ingest` / `listen` / `close` facade;
//! - [`builder`]: sink construction;
//! - [`config`]: queue capacity and delivery policy.

mod builder;
mod config;
mod listener;
mod log_sink;
mod registry;

pub use builder::LogSinkBuilder;
pub use config::{DEFAULT_QUEUE_CAPACITY, SinkConfig};
pub use listener::{ListenCancel, Listener};
pub use log_sink::LogSink;
pub use registry::ListenerId;

//! # Log sink: ingest raw records and fan them out to listeners.
//!
//! [`LogSink`] owns a listener registry, a converter and a [`SinkConfig`].
//! Clones share the same registry, so a clone handed to the logging backend
//! and a clone kept by the UI layer see the same listeners.
//!
//! ## Lifecycle
//! ```text
//! LogSink::builder().build()
//!     │
//!     ├─► ingest(raw) ──► converter ──► Err ─► returned, nothing broadcast
//!     │                       └──► Ok(msg) ──► broadcast to all listeners
//!     ├─► listen()    ──► (Listener, ListenCancel)
//!     ├─► attach(sub) ──► Attachment (worker drives a Subscribe)
//!     ├─► sync()      ──► no-op
//!     └─► close()     ──► close every listener; sink stays usable
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use super::builder::LogSinkBuilder;
use super::config::SinkConfig;
use super::listener::{ListenCancel, Listener};
use super::registry::Registry;
use crate::error::SinkError;
use crate::message::Converter;
use crate::subscribers::{Attachment, Subscribe};

/// Concurrent log fan-out sink.
#[derive(Clone)]
pub struct LogSink {
    cfg: SinkConfig,
    converter: Converter,
    registry: Arc<Registry>,
}

impl LogSink {
    /// Creates a sink with default configuration and the default record parser.
    pub fn new() -> Self {
        LogSinkBuilder::new().build()
    }

    /// Returns a builder for custom configuration or converter.
    pub fn builder() -> LogSinkBuilder {
        LogSinkBuilder::new()
    }

    pub(crate) fn from_parts(cfg: SinkConfig, converter: Converter) -> Self {
        Self {
            cfg,
            converter,
            registry: Registry::new(),
        }
    }

    /// Parses one raw record and broadcasts it to every listener.
    ///
    /// Returns `raw.len()` on success, whether or not anyone is listening.
    ///
    /// # Errors
    /// Returns the converter's error (e.g. [`SinkError::MalformedRecord`]);
    /// the record is then not broadcast at all.
    ///
    /// ### Notes
    /// Under [`DeliveryPolicy::Block`](crate::DeliveryPolicy::Block) this waits
    /// for every listener queue to accept the message.
    pub async fn ingest(&self, raw: &[u8]) -> Result<usize, SinkError> {
        let msg = (self.converter)(raw).inspect_err(|e| {
            trace!(error = e.as_label(), len = raw.len(), "record rejected");
        })?;

        self.registry.broadcast(&msg, self.cfg.delivery).await;
        Ok(raw.len())
    }

    /// Registers a new listener.
    ///
    /// The listener only observes messages ingested after this call returns.
    pub async fn listen(&self) -> (Listener, ListenCancel) {
        let reg = self
            .registry
            .register(self.cfg.queue_capacity_clamped())
            .await;
        let cancel = ListenCancel::new(reg.id, Arc::clone(&self.registry));
        (Listener::new(reg), cancel)
    }

    /// Runs a [`Subscribe`] implementation on its own listener and worker task.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn attach(&self, subscriber: Arc<dyn Subscribe>) -> Attachment {
        let (listener, cancel) = self.listen().await;
        Attachment::spawn(subscriber, listener, cancel)
    }

    /// Flushes buffered output. The sink buffers nothing, so this is a no-op.
    pub fn sync(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Closes every current listener.
    ///
    /// The sink itself stays usable: later `listen` calls register fresh
    /// listeners and `ingest` keeps working. Always returns `Ok(())`.
    pub async fn close(&self) -> Result<(), SinkError> {
        let closed = self.registry.clear().await;
        debug!(closed, "log sink closed");
        Ok(())
    }

    /// Number of active listeners.
    pub async fn listener_count(&self) -> usize {
        self.registry.len().await
    }

    /// Returns true if no listener is registered.
    pub async fn is_empty(&self) -> bool {
        self.listener_count().await == 0
    }

    /// Messages dropped across all listeners (only under `DropNewest`).
    pub fn dropped_total(&self) -> u64 {
        self.registry.dropped_total()
    }

    /// Active configuration.
    pub fn config(&self) -> &SinkConfig {
        &self.cfg
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink").field("cfg", &self.cfg).finish_non_exhaustive()
    }
}

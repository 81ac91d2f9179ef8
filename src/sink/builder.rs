use std::sync::Arc;

use super::config::SinkConfig;
use super::log_sink::LogSink;
use crate::error::SinkError;
use crate::message::{Converter, Message, parse_record};
use crate::policies::DeliveryPolicy;

/// Builder for constructing a [`LogSink`] with non-default settings.
pub struct LogSinkBuilder {
    cfg: SinkConfig,
    converter: Converter,
}

impl LogSinkBuilder {
    /// Creates a builder with [`SinkConfig::default`] and [`parse_record`].
    pub fn new() -> Self {
        Self {
            cfg: SinkConfig::default(),
            converter: Arc::new(parse_record),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: SinkConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the per-listener queue capacity (clamped to at least 1).
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.cfg.queue_capacity = capacity;
        self
    }

    /// Sets the delivery policy for full listener queues.
    pub fn with_delivery(mut self, delivery: DeliveryPolicy) -> Self {
        self.cfg.delivery = delivery;
        self
    }

    /// Replaces the record converter.
    ///
    /// The converter must be pure enough to run concurrently from several
    /// `ingest` callers.
    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Message, SinkError> + Send + Sync + 'static,
    {
        self.converter = Arc::new(converter);
        self
    }

    /// Builds the sink with an empty listener registry.
    pub fn build(self) -> LogSink {
        LogSink::from_parts(self.cfg, self.converter)
    }
}

impl Default for LogSinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

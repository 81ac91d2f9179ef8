//! # Sink configuration.
//!
//! Provides [`SinkConfig`] settings shared by every listener of one [`LogSink`](crate::LogSink).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → clamped to 1 (a queue must hold at least one message)

use crate::policies::DeliveryPolicy;

/// Default per-listener queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Configuration for a log sink.
///
/// ## Field semantics
/// - `queue_capacity`: bounded capacity of each listener queue (min 1; clamped)
/// - `delivery`: what a broadcast does when a listener queue is full
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Capacity of each listener's private queue.
    ///
    /// Applies to listeners registered after the sink is built; existing
    /// queues never change size.
    pub queue_capacity: usize,

    /// Delivery policy for full listener queues.
    pub delivery: DeliveryPolicy,
}

impl SinkConfig {
    /// Returns a queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for SinkConfig {
    /// Default configuration:
    ///
    /// - `queue_capacity = 1000`
    /// - `delivery = DeliveryPolicy::Block` (lossless)
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            delivery: DeliveryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SinkConfig::default();
        assert_eq!(cfg.queue_capacity, 1000);
        assert_eq!(cfg.delivery, DeliveryPolicy::Block);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cfg = SinkConfig {
            queue_capacity: 0,
            ..SinkConfig::default()
        };
        assert_eq!(cfg.queue_capacity_clamped(), 1);
    }
}

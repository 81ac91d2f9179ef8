//! # Delivery policies for listener queues.
//!
//! [`DeliveryPolicy`] determines what a broadcast does when a listener's bounded
//! queue is full.
//!
//! - [`DeliveryPolicy::Block`] wait for space in that queue (default).
//! - [`DeliveryPolicy::DropNewest`] drop the message for that listener only.
//!
//! ## Choosing the right policy
//!
//! **Lossless fan-out** (every listener sees every message):
//! ```text
//! DeliveryPolicy::Block        → ingest waits on a full queue;
//!                                later listeners wait behind it;
//!                                listen/cancel/close wait for the broadcast to finish
//! ```
//!
//! **Isolated fan-out** (a slow listener must not stall anyone):
//! ```text
//! DeliveryPolicy::DropNewest   → ingest never waits on a queue;
//!                                the slow listener misses messages (counted)
//! ```

/// Policy controlling delivery into a full listener queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Wait for the listener to free space (default).
    ///
    /// The broadcast holds the registry read lock while waiting, so a stalled
    /// listener also delays membership changes.
    #[default]
    Block,
    /// Skip the listener whose queue is full; the message is dropped for it only.
    DropNewest,
}

impl DeliveryPolicy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryPolicy::Block => "block",
            DeliveryPolicy::DropNewest => "drop_newest",
        }
    }
}

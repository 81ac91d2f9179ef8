//! # Message subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for consumers that prefer a
//! callback over polling a [`Listener`](crate::Listener).
//!
//! Each attached subscriber gets:
//! - **Its own listener** (private bounded queue, sink delivery policy applies)
//! - **Dedicated worker task** (runs independently)
//! - **Panic isolation** (panics are caught, logged, and the worker keeps going)
//!
//! ## Architecture
//! ```text
//! LogSink ──► [listener queue] ──► worker task ──► subscriber.on_message()
//!                                               └─► panic caught → tracing::error!
//! ```
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use logfan::{Message, Subscribe};
//!
//! struct ErrorCounter(std::sync::atomic::AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for ErrorCounter {
//!     async fn on_message(&self, msg: &Message) {
//!         if msg.level() == "error" {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "error-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::message::Message;

/// Log message subscriber.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Under `DeliveryPolicy::Block`, slow processing slows every `ingest`.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single message, in ingest order.
    async fn on_message(&self, msg: &Message);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

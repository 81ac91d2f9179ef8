//! Delivery policies.
//!
//! ## Contents
//! - [`DeliveryPolicy`] what a broadcast does when a listener queue is full
//!
//! ## Defaults
//! - `DeliveryPolicy::Block`: lossless, a slow listener stalls the broadcast.

mod delivery;

pub use delivery::DeliveryPolicy;

//! # Listener registry - the shared state behind a log sink.
//!
//! Maps each [`ListenerId`] to the sending half of that listener's bounded queue.
//!
//! ## Architecture
//! ```text
//! ingest ──► broadcast(msg)   [read lock]  ──► queue 1 ──► Listener 1
//!                                          ──► queue 2 ──► Listener 2
//!                                          ──► queue N ──► Listener N
//!
//! listen ──► register()       [write lock] ──► insert(id, sender)
//! cancel ──► remove(id)       [write lock] ──► drop sender (queue closed)
//! close  ──► clear()          [write lock] ──► drop all senders
//! ```
//!
//! ## Rules
//! - Every entry in the map owns the **only** sender of an open queue.
//! - Removing an entry drops that sender, which closes the queue exactly once.
//! - A broadcast only sends to entries it sees under the read lock, so nothing
//!   can be sent into a queue after its entry was removed.
//! - The lock never leaves this type.
//! - Ids come from a per-registry counter and are never reused.
//! - Entries whose receiver was dropped are pruned on the next `register`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use crate::message::Message;
use crate::policies::DeliveryPolicy;

/// Opaque identity of one listener, unique for the lifetime of its sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Registry side of one listener.
struct Entry {
    sender: mpsc::Sender<Message>,
    /// Messages dropped for this listener (shared with its `Listener`).
    dropped: Arc<AtomicU64>,
}

/// Receiving side handed out by [`Registry::register`].
pub(crate) struct Registration {
    pub(crate) id: ListenerId,
    pub(crate) receiver: mpsc::Receiver<Message>,
    pub(crate) dropped: Arc<AtomicU64>,
}

/// Concurrent map of active listeners.
pub(crate) struct Registry {
    listeners: RwLock<HashMap<ListenerId, Entry>>,
    next_id: AtomicU64,
    dropped_total: AtomicU64,
}

impl Registry {
    /// Creates a new empty registry.
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            dropped_total: AtomicU64::new(0),
        })
    }

    /// Registers a new listener with a queue of `capacity` messages.
    ///
    /// Also prunes entries whose `Listener` was dropped without cancelling.
    pub(crate) async fn register(&self, capacity: usize) -> Registration {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));

        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|_, entry| !entry.sender.is_closed());
        let pruned = before - listeners.len();

        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        listeners.insert(
            id,
            Entry {
                sender,
                dropped: Arc::clone(&dropped),
            },
        );
        let active = listeners.len();
        drop(listeners);

        debug!(listener = %id, capacity, active, pruned, "listener registered");
        Registration {
            id,
            receiver,
            dropped,
        }
    }

    /// Removes a listener and closes its queue.
    ///
    /// Returns `false` if the id was already gone (cancelled or cleared).
    pub(crate) async fn remove(&self, id: ListenerId) -> bool {
        let removed = self.listeners.write().await.remove(&id);
        match removed {
            Some(_entry) => {
                debug!(listener = %id, "listener removed");
                true
            }
            None => false,
        }
    }

    /// Closes every queue and empties the map. Returns how many were closed.
    pub(crate) async fn clear(&self) -> usize {
        let drained: Vec<(ListenerId, Entry)> = {
            let mut listeners = self.listeners.write().await;
            listeners.drain().collect()
        };
        debug!(closed = drained.len(), "all listeners closed");
        drained.len()
    }

    /// Delivers a message to every registered listener.
    ///
    /// Holds the read lock for the whole traversal. Returns the number of
    /// listeners the message was queued for.
    pub(crate) async fn broadcast(&self, msg: &Message, policy: DeliveryPolicy) -> usize {
        let listeners = self.listeners.read().await;
        let mut delivered = 0;

        for (id, entry) in listeners.iter() {
            match policy {
                DeliveryPolicy::Block => {
                    // Err only when the Listener was dropped without cancelling.
                    if entry.sender.send(msg.clone()).await.is_ok() {
                        delivered += 1;
                    }
                }
                DeliveryPolicy::DropNewest => match entry.sender.try_send(msg.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        let dropped = entry.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        self.dropped_total.fetch_add(1, Ordering::Relaxed);
                        warn!(listener = %id, dropped, "listener queue full, message dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {}
                },
            }
        }
        delivered
    }

    /// Number of registered listeners.
    pub(crate) async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// Messages dropped across all listeners since creation.
    pub(crate) fn dropped_total(&self) -> u64 {
        self.dropped_total.load(Ordering::Relaxed)
    }
}

//! # Listener handles.
//!
//! [`LogSink::listen`](crate::LogSink::listen) returns a pair:
//! - [`Listener`] receive-only end of a private bounded queue
//! - [`ListenCancel`] idempotent handle that unregisters the listener
//!
//! ## Lifecycle
//! ```text
//! unregistered ──listen()──► active ──cancel() / close()──► closed
//! ```
//! `closed` is terminal. Messages queued before the transition can still be
//! drained; after that `recv()` returns `None` immediately.
//!
//! ## Notes
//! - Dropping a [`Listener`] without cancelling leaves a closed entry behind;
//!   sends to it are skipped and the next `listen()` prunes it.
//! - There is no built-in receive timeout; wrap `recv()` in `tokio::time::timeout`.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use super::registry::{ListenerId, Registration, Registry};
use crate::message::Message;

/// Receive-only end of one listener queue.
///
/// Also implements [`Stream`], yielding messages until the queue is closed.
#[derive(Debug)]
pub struct Listener {
    id: ListenerId,
    receiver: mpsc::Receiver<Message>,
    dropped: Arc<AtomicU64>,
}

impl Listener {
    pub(crate) fn new(reg: Registration) -> Self {
        Self {
            id: reg.id,
            receiver: reg.receiver,
            dropped: reg.dropped,
        }
    }

    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Receives the next message.
    ///
    /// Returns `None` once the listener was cancelled (or the sink closed) and
    /// every buffered message has been drained.
    pub async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Receives a message without waiting.
    ///
    /// - `Err(TryRecvError::Empty)`: active, nothing queued
    /// - `Err(TryRecvError::Disconnected)`: closed and drained
    pub fn try_recv(&mut self) -> Result<Message, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Messages dropped for this listener under `DeliveryPolicy::DropNewest`.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Stream for Listener {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Cancels one listener.
///
/// Cloneable and idempotent: once a [`cancel`](Self::cancel) call on this handle
/// or a clone has completed, later calls return immediately. A call dropped
/// before completing (e.g. by a timeout) leaves the listener registered, and
/// the next call retries the removal.
#[derive(Clone)]
pub struct ListenCancel {
    id: ListenerId,
    registry: Arc<Registry>,
    done: Arc<AtomicBool>,
}

impl ListenCancel {
    pub(crate) fn new(id: ListenerId, registry: Arc<Registry>) -> Self {
        Self {
            id,
            registry,
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Unregisters the listener and closes its queue.
    ///
    /// Waits for the registry write lock, so under `DeliveryPolicy::Block` it
    /// also waits for any broadcast currently in flight.
    pub async fn cancel(&self) {
        if self.done.load(Ordering::Acquire) {
            return;
        }
        // Removing an absent id is a no-op, so concurrent calls are harmless.
        if !self.registry.remove(self.id).await {
            debug!(listener = %self.id, "listener already closed");
        }
        self.done.store(true, Ordering::Release);
    }

    /// Returns true once a `cancel` call on this handle or a clone has completed.
    pub fn is_cancelled(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl std::fmt::Debug for ListenCancel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenCancel")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

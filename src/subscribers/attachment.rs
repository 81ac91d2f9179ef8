//! # Worker that drives one [`Subscribe`] from a listener.
//!
//! ## Rules
//! - **Per-subscriber FIFO**: messages reach `on_message` in ingest order.
//! - **Panic isolation**: a panicking `on_message` is logged; the worker continues.
//! - **Drain on detach**: `detach()` closes the listener, the worker finishes
//!   the messages already queued, then exits.
//! - **Abort on drop**: a dropped `Attachment` aborts its worker, dropping the listener.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::Subscribe;
use crate::sink::{ListenCancel, Listener, ListenerId};

/// Handle to an attached subscriber.
///
/// Dropping it without [`detach`](Self::detach) aborts the worker; its listener
/// is then pruned by the next `listen()`.
#[must_use = "dropping an Attachment aborts the worker; queued messages are lost"]
pub struct Attachment {
    name: &'static str,
    cancel: ListenCancel,
    worker: JoinHandle<()>,
}

impl Attachment {
    pub(crate) fn spawn(
        sub: Arc<dyn Subscribe>,
        mut listener: Listener,
        cancel: ListenCancel,
    ) -> Self {
        let name = sub.name();
        let id = listener.id();

        let worker = tokio::spawn(async move {
            while let Some(msg) = listener.recv().await {
                let fut = sub.on_message(&msg);

                if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    let info = {
                        let any = &*panic_err;
                        if let Some(msg) = any.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = any.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        }
                    };
                    error!(subscriber = name, listener = %id, panic = %info, "subscriber panicked");
                }
            }
            debug!(subscriber = name, listener = %id, "subscriber worker finished");
        });

        Self {
            name,
            cancel,
            worker,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn listener_id(&self) -> ListenerId {
        self.cancel.id()
    }

    /// Detaches the subscriber and waits for its worker to drain and exit.
    pub async fn detach(mut self) {
        self.cancel.cancel().await;
        if let Err(e) = (&mut self.worker).await {
            error!(subscriber = self.name, error = %e, "subscriber worker failed");
        }
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

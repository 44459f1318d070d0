use crate::core::message::InboundMessage;
use crate::traits::handler::MessageHandler;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, warn};

struct Entry {
    id: u64,
    handler: Arc<dyn MessageHandler>,
}

/// Ordered pub/sub table of message handlers
///
/// Insertion order is preserved and duplicates are permitted: registering
/// the same handler twice yields two independent subscriptions and two
/// invocations per frame. Dispatch snapshots the table first, so handlers
/// registered or removed mid-delivery never invalidate the iteration: the
/// set invoked for a frame is the set registered when delivery began.
pub struct HandlerRegistry {
    entries: Arc<Mutex<Vec<Entry>>>,
    next_id: AtomicU64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a handler, returning the capability that removes it
    pub fn register(&self, handler: Arc<dyn MessageHandler>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().push(Entry { id, handler });
        debug!(id, "Handler registered");
        Subscription {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Number of currently registered handlers
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every registered handler (session teardown)
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        if !entries.is_empty() {
            debug!(count = entries.len(), "Clearing handler registry");
        }
        entries.clear();
    }

    /// Deliver one message to every registered handler, in insertion order
    ///
    /// Each invocation is isolated: an `Err` or a panic inside one handler
    /// is logged and delivery continues with the next. Nothing here can
    /// reach the transport.
    pub fn dispatch(&self, message: &InboundMessage) {
        let snapshot: Vec<(u64, Arc<dyn MessageHandler>)> = self
            .entries
            .lock()
            .iter()
            .map(|e| (e.id, Arc::clone(&e.handler)))
            .collect();

        if snapshot.is_empty() {
            warn!("No message handlers registered, inbound message unobserved");
            return;
        }

        for (id, handler) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler.handle(message))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(id, "Message handler failed: {}", e),
                Err(_) => error!(id, "Message handler panicked"),
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability to remove one handler registration
///
/// Removing is idempotent: unsubscribing a handler that is already gone
/// (individually or via session teardown) is a no-op. Dropping the
/// subscription without calling `unsubscribe` leaves the handler
/// registered.
pub struct Subscription {
    id: u64,
    entries: Weak<Mutex<Vec<Entry>>>,
}

impl Subscription {
    /// Remove this registration from the registry
    pub fn unsubscribe(self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().retain(|e| e.id != self.id);
            debug!(id = self.id, "Handler unsubscribed");
        }
    }
}

use crate::traits::error::Result;
use std::sync::Weak;
use tracing::debug;

/// Lifecycle and data events a transport reports to its owner
///
/// These mirror the four callbacks of a browser-style socket: open,
/// message, error, close. Errors are informational; the terminal event for
/// a dead transport is always `Closed`.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The socket finished its handshake and is ready for traffic
    Opened,
    /// A text frame arrived
    Frame(String),
    /// A transport-level error occurred (a `Closed` will follow)
    Error(String),
    /// The socket is gone, cleanly or not
    Closed,
}

/// Receiver side of transport events
///
/// Implemented by the connection manager. Transports never call this
/// directly; they go through an [`EventSink`] so every event carries the
/// session generation it belongs to.
pub trait TransportEvents: Send + Sync {
    /// Deliver one event from the transport of the given session generation
    fn on_transport_event(&self, generation: u64, event: TransportEvent);
}

/// Generation-tagged handle a transport uses to report events
///
/// Cheap to clone, safe to hold after the owning manager is dropped (events
/// are then discarded). The generation lets the manager drop events from a
/// socket that has since been torn down.
#[derive(Clone)]
pub struct EventSink {
    target: Weak<dyn TransportEvents>,
    generation: u64,
}

impl EventSink {
    /// Create a sink delivering to `target`, tagged with `generation`
    pub fn new(target: Weak<dyn TransportEvents>, generation: u64) -> Self {
        Self { target, generation }
    }

    /// The session generation this sink reports for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report a completed handshake
    pub fn opened(&self) {
        self.emit(TransportEvent::Opened);
    }

    /// Report an inbound text frame
    pub fn frame(&self, text: String) {
        self.emit(TransportEvent::Frame(text));
    }

    /// Report a transport error
    pub fn error(&self, message: String) {
        self.emit(TransportEvent::Error(message));
    }

    /// Report that the socket is gone
    pub fn closed(&self) {
        self.emit(TransportEvent::Closed);
    }

    fn emit(&self, event: TransportEvent) {
        match self.target.upgrade() {
            Some(target) => target.on_transport_event(self.generation, event),
            None => debug!("Transport event after manager dropped, discarding"),
        }
    }
}

/// Factory for live transports
///
/// `connect` must not block: real implementations spawn their I/O and
/// return a handle immediately. Failures discovered after return are
/// reported through the sink as `Error` followed by `Closed`. Events must
/// never be delivered synchronously from inside `connect`; the caller may
/// hold locks the event path takes.
pub trait Connector: Send + Sync {
    /// Start connecting to `url`, reporting lifecycle events through `sink`
    fn connect(&self, url: &str, sink: EventSink) -> Result<Box<dyn TransportHandle>>;
}

/// Write side of a live transport
pub trait TransportHandle: Send {
    /// Queue a text frame for transmission (non-blocking)
    fn send(&self, text: &str) -> Result<()>;

    /// Ask the transport to close (non-blocking, idempotent)
    fn close(&self);
}

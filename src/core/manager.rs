use crate::core::config::SocketConfig;
use crate::core::connection_state::ConnectionState;
use crate::core::message::{InboundMessage, OutboundMessage};
use crate::core::registry::{HandlerRegistry, Subscription};
use crate::core::ws::WsConnector;
use crate::traits::credentials::CredentialProvider;
use crate::traits::error::{ChatSocketError, Result};
use crate::traits::handler::MessageHandler;
use crate::traits::scheduler::{Scheduler, TokioScheduler};
use crate::traits::transport::{
    Connector, EventSink, TransportEvent, TransportEvents, TransportHandle,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Diagnostic snapshot of a socket
#[derive(Debug, Clone)]
pub struct SocketStats {
    pub connected: bool,
    pub conversation_id: Option<String>,
    /// Cumulative inbound frames since construction (survives reconnects
    /// and conversation switches)
    pub messages_received: u64,
    pub handler_count: usize,
    /// Raw transport state code (browser readyState numbering)
    pub state_code: u8,
}

/// The session record: one conversation's live or pending stream
struct Session {
    conversation_id: Option<String>,
    state: ConnectionState,
    transport: Option<Box<dyn TransportHandle>>,
    /// Unexpected closures since the last successful open
    attempt_count: u32,
    /// True when the caller asked for the close; suppresses reconnection
    manual_close: bool,
    /// Bumped on every connect/disconnect; transport events and reconnect
    /// timers carrying an older generation are stale and get dropped
    generation: u64,
    messages_received: u64,
}

impl Session {
    fn new() -> Self {
        Self {
            conversation_id: None,
            state: ConnectionState::Idle,
            transport: None,
            attempt_count: 0,
            manual_close: false,
            generation: 0,
            messages_received: 0,
        }
    }

    fn is_open(&self) -> bool {
        self.transport.is_some() && self.state == ConnectionState::Open
    }
}

struct Inner {
    self_weak: Weak<Inner>,
    config: SocketConfig,
    connector: Arc<dyn Connector>,
    scheduler: Arc<dyn Scheduler>,
    credentials: Arc<dyn CredentialProvider>,
    session: Mutex<Session>,
    registry: HandlerRegistry,
}

/// Connection manager for one conversation's real-time chat stream
///
/// Owns the single transport socket and its lifecycle, reconnects after
/// unexpected closures with linear backoff, and fans every inbound frame
/// out to the registered handlers.
///
/// Construct one instance per process and share it (`Clone` is cheap);
/// consumers needing the same conversation's stream register separate
/// handlers on the shared instance rather than building their own.
/// `connect` and `send` are non-blocking: outcomes surface via return
/// values or later transport events, never by waiting on the network.
#[derive(Clone)]
pub struct ChatSocket {
    inner: Arc<Inner>,
}

impl ChatSocket {
    /// Create a socket with explicit collaborators (dependency injection)
    pub fn new(
        config: SocketConfig,
        connector: Arc<dyn Connector>,
        scheduler: Arc<dyn Scheduler>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak| Inner {
            self_weak: weak.clone(),
            config,
            connector,
            scheduler,
            credentials,
            session: Mutex::new(Session::new()),
            registry: HandlerRegistry::new(),
        });
        Self { inner }
    }

    /// Create a socket over the real WebSocket transport and tokio timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_defaults(config: SocketConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::new(
            config,
            Arc::new(WsConnector),
            Arc::new(TokioScheduler),
            credentials,
        )
    }

    /// Open (or switch) the session to `conversation_id`
    ///
    /// No-op when already open for the same conversation. A session for a
    /// different conversation, or any half-built one, is manually torn
    /// down first. Fails fast with
    /// [`ChatSocketError::MissingCredential`] when no bearer token is
    /// available; transport construction failures are not surfaced here
    /// but routed into the reconnection policy.
    pub fn connect(&self, conversation_id: &str) -> Result<()> {
        self.inner.connect(conversation_id)
    }

    /// Send a chat message on the open session
    ///
    /// Fails with [`ChatSocketError::NotConnected`] unless the session is
    /// open; nothing is transmitted and no state changes on failure.
    pub fn send(&self, content: &str) -> Result<()> {
        self.inner.send(content)
    }

    /// Tear the session down: no reconnect will follow
    ///
    /// Idempotent; clears the conversation, the transport, and every
    /// registered handler, and orphans any pending reconnect attempt.
    pub fn disconnect(&self) {
        let mut session = self.inner.session.lock();
        self.inner.teardown_locked(&mut session);
    }

    /// True iff a socket exists and its state is open
    pub fn is_connected(&self) -> bool {
        self.inner.session.lock().is_open()
    }

    /// Read-only diagnostic snapshot
    pub fn stats(&self) -> SocketStats {
        let session = self.inner.session.lock();
        SocketStats {
            connected: session.is_open(),
            conversation_id: session.conversation_id.clone(),
            messages_received: session.messages_received,
            handler_count: self.inner.registry.len(),
            state_code: session.state.code(),
        }
    }

    /// Register a handler for inbound messages
    ///
    /// Handlers may be registered before the socket opens. The returned
    /// subscription removes exactly this registration; registering the
    /// same handler twice yields two invocations per frame.
    pub fn on_message<H>(&self, handler: H) -> Subscription
    where
        H: MessageHandler + 'static,
    {
        self.inner.registry.register(Arc::new(handler))
    }
}

impl Inner {
    fn connect(&self, conversation_id: &str) -> Result<()> {
        let mut session = self.session.lock();

        if session.is_open() && session.conversation_id.as_deref() == Some(conversation_id) {
            debug!(conversation_id, "Already connected, nothing to do");
            return Ok(());
        }

        // Switching conversations, or rebuilding over a half-open socket:
        // manual teardown of the old session first, handlers included. A
        // closed session reconnecting to the same conversation keeps its
        // handlers.
        let switching = session.conversation_id.is_some()
            && session.conversation_id.as_deref() != Some(conversation_id);
        let live = session.transport.is_some()
            || matches!(
                session.state,
                ConnectionState::Connecting | ConnectionState::Open | ConnectionState::Closing
            );
        if switching || live {
            self.teardown_locked(&mut session);
        }

        let token = match self.credentials.bearer_token() {
            Some(token) => token,
            None => {
                error!("No credential available, refusing to connect");
                return Err(ChatSocketError::MissingCredential);
            }
        };

        session.conversation_id = Some(conversation_id.to_string());
        session.manual_close = false; // a fresh connect re-arms reconnection
        session.state = ConnectionState::Connecting;
        session.generation += 1;
        let generation = session.generation;

        let url = self.config.socket_url(&token, conversation_id)?;
        if let Ok(redacted) = self.config.socket_url("TOKEN_HIDDEN", conversation_id) {
            info!("Connecting to {}", redacted);
        }

        let target: Weak<dyn TransportEvents> = self.self_weak.clone();
        let sink = EventSink::new(target, generation);

        match self.connector.connect(&url, sink) {
            Ok(transport) => {
                session.transport = Some(transport);
                Ok(())
            }
            Err(e) => {
                // Construction failures feed the reconnection policy
                // instead of the caller.
                error!("Socket construction failed: {}", e);
                session.state = ConnectionState::Closed;
                self.schedule_reconnect_locked(&mut session);
                Ok(())
            }
        }
    }

    fn send(&self, content: &str) -> Result<()> {
        let session = self.session.lock();
        let (transport, conversation_id) = match (&session.transport, &session.conversation_id) {
            (Some(transport), Some(conversation_id)) if session.state == ConnectionState::Open => {
                (transport, conversation_id)
            }
            _ => {
                warn!(state = %session.state, "Cannot send, socket is not open");
                return Err(ChatSocketError::NotConnected {
                    state: session.state.as_str(),
                });
            }
        };

        let frame = OutboundMessage::chat(conversation_id, content).to_wire()?;
        transport.send(&frame)?;
        debug!("Message sent: {}", frame);
        Ok(())
    }

    /// Tear down the current session. `manual_close` is raised before the
    /// transport closes so the resulting close event cannot race a
    /// reconnect into existence.
    fn teardown_locked(&self, session: &mut Session) {
        session.manual_close = true;
        if let Some(transport) = session.transport.take() {
            session.state = ConnectionState::Closing;
            transport.close();
        }
        session.conversation_id = None;
        session.state = ConnectionState::Idle;
        session.generation += 1; // orphans in-flight events and pending timers
        self.registry.clear();
    }

    fn schedule_reconnect_locked(&self, session: &mut Session) {
        if session.manual_close {
            return;
        }
        let conversation_id = match session.conversation_id.clone() {
            Some(id) => id,
            None => {
                debug!("No conversation to reconnect to");
                return;
            }
        };

        session.attempt_count += 1;
        let attempt = session.attempt_count;

        match self.config.reconnect.next_delay(attempt) {
            Some(delay) => {
                info!(attempt, ?delay, "Scheduling reconnect");
                let target = self.self_weak.clone();
                let generation = session.generation;
                self.scheduler.schedule(
                    delay,
                    Box::new(move || {
                        if let Some(inner) = target.upgrade() {
                            inner.retry(&conversation_id, generation);
                        }
                    }),
                );
            }
            None => {
                warn!(attempt, "Reconnect attempts exhausted, staying closed");
            }
        }
    }

    /// Deferred reconnect attempt, scheduled by `schedule_reconnect_locked`
    fn retry(&self, conversation_id: &str, scheduled_generation: u64) {
        {
            let session = self.session.lock();
            // Fire-time guard: a disconnect or a fresh connect since this
            // attempt was scheduled orphans it.
            if session.manual_close
                || session.conversation_id.is_none()
                || session.generation != scheduled_generation
            {
                debug!("Suppressing stale reconnect attempt");
                return;
            }
        }

        info!(conversation_id, "Attempting to reconnect");
        if let Err(e) = self.connect(conversation_id) {
            warn!("Reconnect attempt failed: {}", e);
        }
    }
}

impl TransportEvents for Inner {
    fn on_transport_event(&self, generation: u64, event: TransportEvent) {
        let mut session = self.session.lock();
        if generation != session.generation {
            debug!(
                generation,
                current = session.generation,
                "Stale transport event, discarding"
            );
            return;
        }

        match event {
            TransportEvent::Opened => {
                info!(
                    conversation_id = session.conversation_id.as_deref().unwrap_or(""),
                    "Socket open"
                );
                session.state = ConnectionState::Open;
                session.attempt_count = 0;
                session.manual_close = false;
            }
            TransportEvent::Frame(text) => {
                session.messages_received += 1;
                // Handlers may reenter send/disconnect/on_message, so the
                // session lock is released before dispatch.
                drop(session);
                let message = InboundMessage::classify(text);
                self.registry.dispatch(&message);
            }
            TransportEvent::Error(message) => {
                error!("Transport error: {}", message);
            }
            TransportEvent::Closed => {
                info!(manual = session.manual_close, "Socket closed");
                session.transport = None;
                session.state = ConnectionState::Closed;
                if !session.manual_close {
                    self.schedule_reconnect_locked(&mut session);
                }
            }
        }
    }
}

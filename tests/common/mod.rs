//! Common test utilities for chatsock integration tests
//!
//! Provides a fake transport the tests drive by hand and a manually
//! advanced scheduler, so connection lifecycles and reconnect timing run
//! deterministically without a network or a real clock.

#![allow(dead_code)]

use chatsock::traits::error::{ChatSocketError, Result};
use chatsock::traits::scheduler::Scheduler;
use chatsock::traits::transport::{Connector, EventSink, TransportHandle};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Install a tracing subscriber when TEST_LOG is set
pub fn init_tracing() {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// One socket produced by the fake connector
///
/// Tests drive the lifecycle through `sink` (open, frame, error, close)
/// and observe the write side through `sent` and `closed`.
#[derive(Clone)]
pub struct FakeConnection {
    pub url: String,
    pub sink: EventSink,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl FakeConnection {
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

struct FakeHandle {
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl TransportHandle for FakeHandle {
    fn send(&self, text: &str) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChatSocketError::Transport("fake socket closed".into()));
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[derive(Default)]
struct ConnectorState {
    connections: Vec<FakeConnection>,
    fail_attempts: usize,
}

/// Connector whose sockets are driven by the test instead of a network
///
/// Every `connect` records a [`FakeConnection`]; nothing happens until the
/// test emits events through its sink. `fail_attempts` makes the next N
/// construction attempts fail synchronously.
#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<ConnectorState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` connect calls fail at the construction boundary
    pub fn fail_next(&self, n: usize) {
        self.state.lock().fail_attempts = n;
    }

    /// Total connect calls that produced a socket
    pub fn connection_count(&self) -> usize {
        self.state.lock().connections.len()
    }

    pub fn connection(&self, index: usize) -> FakeConnection {
        self.state.lock().connections[index].clone()
    }

    pub fn last_connection(&self) -> FakeConnection {
        let state = self.state.lock();
        state.connections.last().expect("no connections made").clone()
    }
}

impl Connector for FakeConnector {
    fn connect(&self, url: &str, sink: EventSink) -> Result<Box<dyn TransportHandle>> {
        let mut state = self.state.lock();
        if state.fail_attempts > 0 {
            state.fail_attempts -= 1;
            return Err(ChatSocketError::Transport("simulated refusal".into()));
        }

        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        state.connections.push(FakeConnection {
            url: url.to_string(),
            sink,
            sent: Arc::clone(&sent),
            closed: Arc::clone(&closed),
        });
        Ok(Box::new(FakeHandle { sent, closed }))
    }
}

struct ScheduledTask {
    due: Duration,
    delay: Duration,
    task: Box<dyn FnOnce() + Send>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    tasks: Vec<ScheduledTask>,
}

/// Scheduler with a hand-cranked clock
///
/// Tasks run only when `advance` moves the clock past their due time, so
/// tests observe the exact requested delays and can interleave other
/// operations before a timer fires.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks not yet fired
    pub fn pending(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Delays requested by every schedule call still pending, oldest first
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.state.lock().tasks.iter().map(|t| t.delay).collect()
    }

    /// Move the clock forward, firing every task that comes due
    ///
    /// Fired tasks may schedule new ones; those fire too if they come due
    /// within the same advance.
    pub fn advance(&self, delta: Duration) {
        let now = {
            let mut state = self.state.lock();
            state.now += delta;
            state.now
        };

        loop {
            let due_task = {
                let mut state = self.state.lock();
                match state.tasks.iter().position(|t| t.due <= now) {
                    Some(index) => Some(state.tasks.remove(index)),
                    None => None,
                }
            };
            // Run outside the lock: the task may re-enter the scheduler.
            match due_task {
                Some(entry) => (entry.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        let mut state = self.state.lock();
        let due = state.now + delay;
        state.tasks.push(ScheduledTask { due, delay, task });
    }
}

/// Standard harness: a socket wired to the fake transport and manual clock
pub struct Harness {
    pub socket: chatsock::ChatSocket,
    pub connector: FakeConnector,
    pub scheduler: ManualScheduler,
    pub credentials: chatsock::SharedCredentialStore,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let connector = FakeConnector::new();
        let scheduler = ManualScheduler::new();
        let credentials = chatsock::SharedCredentialStore::new();
        credentials.set("test-jwt");

        let socket = chatsock::ChatSocket::new(
            chatsock::SocketConfig::new(chatsock::PageOrigin::insecure("localhost:5173")),
            Arc::new(connector.clone()),
            Arc::new(scheduler.clone()),
            Arc::new(credentials.clone()),
        );

        Self {
            socket,
            connector,
            scheduler,
            credentials,
        }
    }

    /// Connect and walk the fake transport to the open state
    pub fn connect_open(&self, conversation_id: &str) -> FakeConnection {
        self.socket.connect(conversation_id).unwrap();
        let conn = self.connector.last_connection();
        conn.sink.opened();
        conn
    }
}

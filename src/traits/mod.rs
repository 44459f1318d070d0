//! # chatsock traits
//!
//! The pluggable seams of the transport layer:
//!
//! - **Connector / TransportHandle**: abstract socket construction and the
//!   write side, so the state machine is testable without a network
//! - **ReconnectPolicy**: decide if/when a dropped session is rebuilt
//! - **Scheduler**: deferred execution for reconnect timers
//! - **CredentialProvider**: read-only access to the bearer credential
//! - **MessageHandler**: consumer callback for inbound messages

pub mod credentials;
pub mod error;
pub mod handler;
pub mod reconnect;
pub mod scheduler;
pub mod transport;

// Re-export commonly used types
pub use credentials::{CredentialProvider, SharedCredentialStore, StaticCredential};
pub use error::{ChatSocketError, Result};
pub use handler::MessageHandler;
pub use reconnect::{LinearBackoff, NeverReconnect, ReconnectPolicy};
pub use scheduler::{Scheduler, TokioScheduler};
pub use transport::{Connector, EventSink, TransportEvent, TransportEvents, TransportHandle};

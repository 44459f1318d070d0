//! # chatsock
//!
//! The real-time transport layer of a chat client: one logical
//! subscription to a remote message stream per active conversation,
//! automatic reconnection with linear backoff after transient failures,
//! and fan-out delivery of every inbound frame to multiple independent
//! consumers.
//!
//! ## Features
//!
//! - **Single-session manager**: one conversation at a time, idempotent
//!   connect, teardown-before-switch, manual close vs. transport close
//! - **Linear backoff reconnection**: attempt-indexed delays with a hard
//!   ceiling, stale attempts suppressed by a session generation guard
//! - **Fan-out dispatch**: ordered handler registry with snapshot
//!   delivery and per-handler failure isolation
//! - **Testable seams**: transport, timer, and credential access are
//!   traits, so the whole state machine runs against fakes
//!
//! ## Example
//!
//! ```rust,ignore
//! use chatsock::{ChatSocket, PageOrigin, SharedCredentialStore, SocketConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> chatsock::Result<()> {
//!     let credentials = SharedCredentialStore::new();
//!     credentials.set(jwt_from_login);
//!
//!     let socket = ChatSocket::with_defaults(
//!         SocketConfig::new(PageOrigin::insecure("localhost:5173")),
//!         Arc::new(credentials),
//!     );
//!
//!     let sub = socket.on_message(|msg: &chatsock::InboundMessage| {
//!         println!("inbound: {:?}", msg);
//!         Ok(())
//!     });
//!
//!     socket.connect("42")?;
//!     socket.send("hi")?;
//!
//!     sub.unsubscribe();
//!     socket.disconnect();
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use self::core::{
    ChatSocket, ConnectionState, HandlerRegistry, InboundMessage, OutboundMessage, PageOrigin,
    SocketConfig, SocketStats, Subscription, WsConnector,
};

/// Type alias for Result with ChatSocketError
pub type Result<T> = std::result::Result<T, traits::ChatSocketError>;

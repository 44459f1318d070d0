//! Core machinery: the session state machine, message types, handler
//! registry, endpoint construction, and the real WebSocket transport.

pub mod config;
pub mod connection_state;
pub mod endpoint;
pub mod manager;
pub mod message;
pub mod registry;
pub mod ws;

// Re-export main types
pub use config::SocketConfig;
pub use connection_state::ConnectionState;
pub use endpoint::PageOrigin;
pub use manager::{ChatSocket, SocketStats};
pub use message::{InboundMessage, OutboundMessage};
pub use registry::{HandlerRegistry, Subscription};
pub use ws::WsConnector;

use thiserror::Error;

/// Main error type for chatsock
#[derive(Error, Debug)]
pub enum ChatSocketError {
    /// No bearer credential available when connect() was called
    #[error("No credential available for connect")]
    MissingCredential,

    /// send() called while the session is not open
    #[error("Socket is not open (state: {state})")]
    NotConnected { state: &'static str },

    /// Transport-level failure (construction or write)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Message serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Socket endpoint could not be constructed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Handler failure surfaced by a registered consumer
    #[error("Handler error: {0}")]
    Handler(String),
}

/// Result type for chatsock operations
pub type Result<T> = std::result::Result<T, ChatSocketError>;

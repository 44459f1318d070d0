/// Lifecycle state of a chat session's transport
///
/// Transitions are driven only by transport events and explicit caller
/// actions: `Idle → Connecting → Open → Closing → Closed`, with
/// `connect()` the sole way out of `Idle`/`Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket exists
    Idle,
    /// Socket construction started, handshake not finished
    Connecting,
    /// Handshake complete, traffic allowed
    Open,
    /// Close requested, socket not yet gone
    Closing,
    /// Socket gone (cleanly or not)
    Closed,
}

impl ConnectionState {
    /// Raw numeric state code, following browser readyState numbering
    /// (0 = connecting, 1 = open, 2 = closing, 3 = closed); `Idle` gets 4
    /// since a browser socket simply does not exist in that state.
    pub fn code(&self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Open => 1,
            ConnectionState::Closing => 2,
            ConnectionState::Closed => 3,
            ConnectionState::Idle => 4,
        }
    }

    /// Short name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::core::endpoint::{socket_url, PageOrigin};
use crate::traits::error::Result;
use crate::traits::reconnect::{LinearBackoff, ReconnectPolicy};

/// Configuration for a [`ChatSocket`](crate::core::manager::ChatSocket)
///
/// Carries the endpoint construction rules and the reconnection policy.
/// Defaults match the chat backend's development setup: socket path
/// `/api/v1/chat/socket`, dev backend at `localhost:8080`, linear backoff
/// with a five-attempt ceiling.
pub struct SocketConfig {
    origin: PageOrigin,
    path: String,
    dev_host: String,
    pub(crate) reconnect: Box<dyn ReconnectPolicy>,
}

impl SocketConfig {
    /// Create a configuration for a client served from `origin`
    pub fn new(origin: PageOrigin) -> Self {
        Self {
            origin,
            path: "/api/v1/chat/socket".to_string(),
            dev_host: "localhost:8080".to_string(),
            reconnect: Box::new(LinearBackoff::default()),
        }
    }

    /// Override the socket endpoint path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Override the development backend host used for loopback origins
    pub fn dev_host(mut self, host: impl Into<String>) -> Self {
        self.dev_host = host.into();
        self
    }

    /// Replace the reconnection policy
    pub fn reconnect_policy(mut self, policy: impl ReconnectPolicy + 'static) -> Self {
        self.reconnect = Box::new(policy);
        self
    }

    /// Build the socket URL for one conversation
    pub(crate) fn socket_url(&self, token: &str, room: &str) -> Result<String> {
        socket_url(&self.origin, &self.dev_host, &self.path, token, room)
    }
}

use parking_lot::RwLock;
use std::sync::Arc;

/// Trait for supplying the bearer credential used to open a session
///
/// The transport layer only ever reads the credential; writing it is the
/// job of whatever auth layer owns the login flow. A missing credential is
/// a precondition failure for `connect()`, never a panic.
pub trait CredentialProvider: Send + Sync {
    /// Get the current bearer token, if one is present
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed credential, useful for tests and one-off tooling
pub struct StaticCredential(pub String);

impl CredentialProvider for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Process-wide credential slot shared between the auth layer and the socket
///
/// The auth layer calls `set`/`clear` as the user logs in and out; the
/// socket only reads. Clone is cheap (shared interior).
#[derive(Clone, Default)]
pub struct SharedCredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl SharedCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new bearer token, replacing any previous one
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Remove the stored token
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl CredentialProvider for SharedCredentialStore {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

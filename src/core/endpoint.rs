use crate::traits::error::{ChatSocketError, Result};
use url::Url;

/// The origin the client is served from
///
/// Drives socket address construction: a secure origin yields `wss`, and a
/// loopback origin is redirected at the development backend instead of the
/// page host.
#[derive(Debug, Clone)]
pub struct PageOrigin {
    /// True when the origin scheme is secure (https)
    pub secure: bool,
    /// Origin host, possibly including a port (e.g. `localhost:5173`)
    pub host: String,
}

impl PageOrigin {
    /// An https origin
    pub fn secure(host: impl Into<String>) -> Self {
        Self {
            secure: true,
            host: host.into(),
        }
    }

    /// An http origin
    pub fn insecure(host: impl Into<String>) -> Self {
        Self {
            secure: false,
            host: host.into(),
        }
    }

    /// Hostname part of the origin host, without any port
    fn hostname(&self) -> &str {
        self.host.split(':').next().unwrap_or(&self.host)
    }

    /// Whether the origin is the local-loopback development host
    pub fn is_loopback(&self) -> bool {
        self.hostname() == "localhost"
    }
}

/// Build the chat socket URL for one conversation
///
/// Scheme follows the origin's security (`wss` for https origins, `ws`
/// otherwise); the host falls back to `dev_host` when the page is served
/// from localhost; `token` and `room` ride as percent-encoded query
/// parameters.
pub fn socket_url(
    origin: &PageOrigin,
    dev_host: &str,
    path: &str,
    token: &str,
    room: &str,
) -> Result<String> {
    let scheme = if origin.secure { "wss" } else { "ws" };
    let host = if origin.is_loopback() {
        dev_host
    } else {
        origin.host.as_str()
    };

    let mut url = Url::parse(&format!("{}://{}{}", scheme, host, path))
        .map_err(|e| ChatSocketError::InvalidEndpoint(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("token", token)
        .append_pair("room", room);

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/api/v1/chat/socket";

    #[test]
    fn test_loopback_uses_dev_host_and_ws() {
        let origin = PageOrigin::insecure("localhost:5173");
        let url = socket_url(&origin, "localhost:8080", PATH, "tok", "42").unwrap();
        assert_eq!(
            url,
            "ws://localhost:8080/api/v1/chat/socket?token=tok&room=42"
        );
    }

    #[test]
    fn test_secure_origin_uses_wss_and_origin_host() {
        let origin = PageOrigin::secure("chat.example.com");
        let url = socket_url(&origin, "localhost:8080", PATH, "tok", "42").unwrap();
        assert_eq!(
            url,
            "wss://chat.example.com/api/v1/chat/socket?token=tok&room=42"
        );
    }

    #[test]
    fn test_query_parameters_are_percent_encoded() {
        let origin = PageOrigin::insecure("localhost");
        let url = socket_url(&origin, "localhost:8080", PATH, "a b&c", "room/7").unwrap();
        assert!(url.contains("token=a+b%26c") || url.contains("token=a%20b%26c"));
        assert!(url.contains("room=room%2F7"));
    }

    #[test]
    fn test_non_loopback_host_kept_verbatim() {
        let origin = PageOrigin::insecure("10.0.0.5:3000");
        let url = socket_url(&origin, "localhost:8080", PATH, "t", "r").unwrap();
        assert!(url.starts_with("ws://10.0.0.5:3000/"));
    }
}

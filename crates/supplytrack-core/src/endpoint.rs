//! Notification endpoint derivation
//!
//! The endpoint lives on the same origin as the hosting page at a fixed path.
//! Secure pages get a secure channel: `https → wss`, `http → ws`.

use crate::errors::ConfigError;
use std::fmt;
use url::Url;

/// Fixed path of the notification channel
pub const NOTIFICATIONS_PATH: &str = "/ws/notifications/";

/// Resolved channel endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Derive the endpoint for a page origin
    pub fn from_origin(origin: &Url) -> Result<Self, ConfigError> {
        let scheme = match origin.scheme() {
            "https" => "wss",
            "http" => "ws",
            other => {
                return Err(ConfigError::invalid_origin(
                    origin.as_str(),
                    format!("unsupported scheme `{other}`"),
                ))
            }
        };

        let host = origin
            .host_str()
            .ok_or_else(|| ConfigError::invalid_origin(origin.as_str(), "missing host"))?;
        let authority = match origin.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let url = Url::parse(&format!("{scheme}://{authority}{NOTIFICATIONS_PATH}"))
            .map_err(|e| ConfigError::invalid_origin(origin.as_str(), e.to_string()))?;
        Ok(Self { url })
    }

    /// Parse an origin string and derive its endpoint
    pub fn parse_origin(origin: &str) -> Result<Self, ConfigError> {
        let parsed =
            Url::parse(origin).map_err(|e| ConfigError::invalid_origin(origin, e.to_string()))?;
        Self::from_origin(&parsed)
    }

    /// Endpoint URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Endpoint URL as text
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Whether the channel is TLS-protected
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "wss"
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_pages_get_secure_channels() {
        let endpoint = Endpoint::parse_origin("https://shop.example.com/inventory/?page=2").unwrap();
        assert_eq!(endpoint.as_str(), "wss://shop.example.com/ws/notifications/");
        assert!(endpoint.is_secure());
    }

    #[test]
    fn plain_pages_keep_their_port() {
        let endpoint = Endpoint::parse_origin("http://localhost:8000").unwrap();
        assert_eq!(endpoint.as_str(), "ws://localhost:8000/ws/notifications/");
        assert!(!endpoint.is_secure());
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let endpoint = Endpoint::parse_origin("http://[::1]:9000/").unwrap();
        assert_eq!(endpoint.as_str(), "ws://[::1]:9000/ws/notifications/");
    }

    #[test]
    fn non_http_origins_are_rejected() {
        for origin in ["ftp://example.com", "file:///tmp/page.html", "not a url"] {
            assert!(
                matches!(
                    Endpoint::parse_origin(origin),
                    Err(ConfigError::InvalidOrigin { .. })
                ),
                "{origin} should be rejected"
            );
        }
    }
}

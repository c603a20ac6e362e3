//! Notification pipeline configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! yields the documented behavior:
//!
//! ```toml
//! origin = "https://shop.example.com"
//!
//! [reconnect]
//! max_attempts = 5
//! base_delay_ms = 1000
//! connect_timeout_ms = 10000
//!
//! [keepalive]
//! interval_ms = 30000
//!
//! [toasts]
//! warning_timeout_ms = 10000
//! success_timeout_ms = 5000
//! info_timeout_ms = 5000
//! flash_timeout_ms = 3000
//! event_buffer = 256
//! ```

use crate::endpoint::Endpoint;
use crate::errors::ConfigError;
use crate::toast::ToastLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Origin of the hosting page; the channel endpoint is derived from it
    pub origin: String,
    /// Reconnection policy
    pub reconnect: ReconnectSettings,
    /// Keepalive policy
    pub keepalive: KeepaliveSettings,
    /// Toast presentation
    pub toasts: ToastSettings,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
            reconnect: ReconnectSettings::default(),
            keepalive: KeepaliveSettings::default(),
            toasts: ToastSettings::default(),
        }
    }
}

/// Reconnection policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectSettings {
    /// Reconnect attempts before giving up
    pub max_attempts: u32,
    /// Linear backoff step
    pub base_delay_ms: u64,
    /// Handshake timeout applied by the channel handler
    pub connect_timeout_ms: u64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl ReconnectSettings {
    /// Backoff step as a duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Handshake timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Keepalive policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepaliveSettings {
    /// Probe interval
    pub interval_ms: u64,
}

impl Default for KeepaliveSettings {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
        }
    }
}

impl KeepaliveSettings {
    /// Probe interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Toast presentation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastSettings {
    /// Auto-dismiss for warning toasts
    pub warning_timeout_ms: u64,
    /// Auto-dismiss for success toasts
    pub success_timeout_ms: u64,
    /// Auto-dismiss for info toasts
    pub info_timeout_ms: u64,
    /// Uniform auto-dismiss for one-shot page flashes
    pub flash_timeout_ms: u64,
    /// Per-subscriber buffer of the notification event bus
    pub event_buffer: usize,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            warning_timeout_ms: 10_000,
            success_timeout_ms: 5_000,
            info_timeout_ms: 5_000,
            flash_timeout_ms: 3_000,
            event_buffer: 256,
        }
    }
}

impl ToastSettings {
    /// Auto-dismiss delay for a channel or programmatic toast of `level`.
    /// Errors only arrive through flashes, so they share the info timeout.
    pub fn timeout_for(&self, level: ToastLevel) -> Duration {
        let ms = match level {
            ToastLevel::Warning => self.warning_timeout_ms,
            ToastLevel::Success => self.success_timeout_ms,
            ToastLevel::Info | ToastLevel::Error => self.info_timeout_ms,
        };
        Duration::from_millis(ms)
    }

    /// Auto-dismiss delay for page flashes
    pub fn flash_timeout(&self) -> Duration {
        Duration::from_millis(self.flash_timeout_ms)
    }
}

impl NotifyConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Derive the channel endpoint from `origin`
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        Endpoint::parse_origin(&self.origin)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;

        if self.reconnect.base_delay_ms == 0 {
            return Err(ConfigError::invalid_value(
                "reconnect.base_delay_ms",
                "must be greater than 0",
            ));
        }
        if self.reconnect.connect_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "reconnect.connect_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.keepalive.interval_ms == 0 {
            return Err(ConfigError::invalid_value(
                "keepalive.interval_ms",
                "must be greater than 0",
            ));
        }

        let toast_timeouts = [
            ("toasts.warning_timeout_ms", self.toasts.warning_timeout_ms),
            ("toasts.success_timeout_ms", self.toasts.success_timeout_ms),
            ("toasts.info_timeout_ms", self.toasts.info_timeout_ms),
            ("toasts.flash_timeout_ms", self.toasts.flash_timeout_ms),
        ];
        for (field, value) in toast_timeouts {
            if value == 0 {
                return Err(ConfigError::invalid_value(field, "must be greater than 0"));
            }
        }

        if self.toasts.event_buffer == 0 {
            return Err(ConfigError::invalid_value(
                "toasts.event_buffer",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = NotifyConfig::default();
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.reconnect.base_delay(), Duration::from_millis(1000));
        assert_eq!(config.keepalive.interval(), Duration::from_secs(30));
        assert_eq!(
            config.toasts.timeout_for(ToastLevel::Warning),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            config.toasts.timeout_for(ToastLevel::Success),
            Duration::from_millis(5_000)
        );
        assert_eq!(config.toasts.flash_timeout(), Duration::from_millis(3_000));
        config.validate().unwrap();
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(NotifyConfig::from_toml_str("").unwrap(), NotifyConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = NotifyConfig::from_toml_str(
            r#"
            origin = "https://shop.example.com"

            [reconnect]
            max_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.reconnect.max_attempts, 3);
        assert_eq!(config.reconnect.base_delay_ms, 1000);
        assert!(config.endpoint().unwrap().is_secure());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut config = NotifyConfig::default();
        config.keepalive.interval_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::invalid_value(
                "keepalive.interval_ms",
                "must be greater than 0"
            ))
        );

        let mut config = NotifyConfig::default();
        config.toasts.flash_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_origin_fails_validation() {
        let config = NotifyConfig {
            origin: "ftp://example.com".to_string(),
            ..NotifyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOrigin { .. })
        ));
    }

    #[test]
    fn unparseable_toml_is_a_parse_error() {
        assert!(matches!(
            NotifyConfig::from_toml_str("origin = "),
            Err(ConfigError::Parse { .. })
        ));
    }
}

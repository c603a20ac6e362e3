//! Unified error system for the notification pipeline
//!
//! Each concern gets a small `thiserror` enum; [`NotifyError`] wraps them for
//! callers that cross concerns (construction, the CLI).

use crate::effects::ChannelId;
use crate::notification::NotificationId;
use std::path::PathBuf;

/// Wire payload could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Channel frame is not a well-formed JSON object with a string `type`
    #[error("Malformed frame: {message}")]
    MalformedFrame {
        /// Decoder message
        message: String,
    },

    /// Outbound frame could not be encoded
    #[error("Failed to encode frame: {message}")]
    Encode {
        /// Encoder message
        message: String,
    },

    /// Page flash payload is not a JSON array of `{message, tags}` objects
    #[error("Malformed flash payload: {message}")]
    MalformedFlash {
        /// Decoder message
        message: String,
    },
}

/// Notification store rejected a mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record with the same id is already present
    #[error("Duplicate notification id: {id}")]
    DuplicateId {
        /// The reused id
        id: NotificationId,
    },
}

/// Configuration could not be loaded or is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The page origin cannot be upgraded to a notification endpoint
    #[error("Invalid origin `{origin}`: {reason}")]
    InvalidOrigin {
        /// Origin as configured
        origin: String,
        /// Why it was rejected
        reason: String,
    },

    /// A numeric setting is out of range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted setting name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// TOML could not be parsed
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// Config file could not be read
    #[error("Failed to read config {}: {message}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// IO message
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid origin error
    pub fn invalid_origin(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

/// Channel handler failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// Connection could not be started
    #[error("Connection failed: {message}")]
    ConnectFailed {
        /// Handler message
        message: String,
    },

    /// Send attempted on a channel that is not open
    #[error("Channel {channel} is not open")]
    NotOpen {
        /// Target channel
        channel: ChannelId,
    },

    /// Frame could not be queued for sending
    #[error("Send failed on channel {channel}: {message}")]
    SendFailed {
        /// Target channel
        channel: ChannelId,
        /// Handler message
        message: String,
    },
}

/// Umbrella error for the notification pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Wire protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Channel error
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Standard Result type for notification pipeline operations
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

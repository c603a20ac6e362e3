//! Channel effects: one persistent, message-framed connection at a time.

use crate::endpoint::Endpoint;
use crate::errors::ChannelError;
use std::fmt;

/// Handler-assigned channel identity. Never reused within a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel-{}", self.0)
    }
}

/// Transport-reported channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Handshake in progress
    Connecting,
    /// Frames may be sent
    Open,
    /// Local close requested
    Closing,
    /// Gone, or never known to this handler
    Closed,
}

impl ChannelState {
    /// Whether frames may be sent right now
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Why a channel stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the connection
    Remote {
        /// Close code, if the peer sent one
        code: Option<u16>,
        /// Close reason text
        reason: String,
    },
    /// Connect, read or write failed
    Error {
        /// Handler message
        message: String,
    },
    /// Closed by this client
    Local,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote {
                code: Some(code),
                reason,
            } => write!(f, "closed by peer ({code}): {reason}"),
            Self::Remote { code: None, reason } => write!(f, "closed by peer: {reason}"),
            Self::Error { message } => write!(f, "transport error: {message}"),
            Self::Local => f.write_str("closed locally"),
        }
    }
}

/// Channel operations.
///
/// `connect` only *starts* a connection; the handler later reports
/// `ChannelOpened` or `ChannelClosed` for the returned id.
pub trait ChannelEffects {
    /// Begin connecting to `endpoint`
    fn connect(&mut self, endpoint: &Endpoint) -> Result<ChannelId, ChannelError>;

    /// Current state as known to the transport, read at call time
    fn state(&self, channel: ChannelId) -> ChannelState;

    /// Queue a text frame
    fn send_text(&mut self, channel: ChannelId, text: &str) -> Result<(), ChannelError>;

    /// Request close; further events for this id may still arrive
    fn close(&mut self, channel: ChannelId);
}

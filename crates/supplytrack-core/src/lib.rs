//! SupplyTrack Core - Notification Pipeline Foundation
//!
//! This crate provides the data model, wire protocol and effect interfaces for
//! the real-time inventory notification pipeline. It contains no transport,
//! timer or rendering implementations; those live in `supplytrack-effects`
//! (production handlers) and `supplytrack-testkit` (deterministic
//! handlers).
//!
//! # Architecture Layers
//!
//! ## Data Model
//! - [`NotificationRecord`]: one inventory event with lifecycle status
//! - [`NotificationId`], [`NotificationKind`], [`NotificationStatus`]
//!
//! ## Wire Protocol
//! - [`InboundFrame`]: `restock_notification`, `restock_resolved`, `pong`
//! - [`OutboundFrame`]: `ping`
//! - [`FlashMessage`]: one-shot page flashes
//!
//! ## Effect Interfaces
//! - `ChannelEffects`: `connect`, `state`, `send_text`, `close`
//! - `TimerEffects`: `schedule_once`, `schedule_repeating`, `cancel`
//! - `ToastSurface`: `mount_host`, `insert_hidden`, `reveal`, `hide`, `detach`
//!
//! All effect interfaces are synchronous and non-blocking. Completion of
//! asynchronous work (a socket opening, a timer elapsing, a user click) is
//! reported back to the client as a [`ClientInput`].

#![forbid(unsafe_code)]

/// Notification pipeline configuration
pub mod config;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Endpoint derivation from the hosting page origin
pub mod endpoint;

/// Unified error handling
pub mod errors;

/// Subscribable notification events
pub mod events;

/// Inputs delivered to the channel client by its driver
pub mod input;

/// Notification records and identifiers
pub mod notification;

/// JSON frame encoding and decoding
pub mod protocol;

/// Toast presentation types
pub mod toast;

pub use config::{KeepaliveSettings, NotifyConfig, ReconnectSettings, ToastSettings};
pub use effects::{
    ChannelEffects, ChannelId, ChannelState, CloseReason, TimerEffects, TimerId, TimerTask,
    ToastSurface, Transition,
};
pub use endpoint::{Endpoint, NOTIFICATIONS_PATH};
pub use errors::{
    ChannelError, ConfigError, NotifyError, NotifyResult, ProtocolError, StoreError,
};
pub use events::{EventBus, NotificationEvent};
pub use input::ClientInput;
pub use notification::{
    NotificationId, NotificationKind, NotificationRecord, NotificationStatus, RestockDetails,
};
pub use protocol::{
    decode_flashes, decode_frame, FlashMessage, InboundFrame, NotificationPayload, OutboundFrame,
};
pub use toast::{ToastId, ToastLevel, ToastView};

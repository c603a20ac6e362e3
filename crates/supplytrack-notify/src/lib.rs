//! SupplyTrack Notify - Real-Time Notification Logic
//!
//! The notification pipeline's state machines, built only on the effect
//! interfaces of `supplytrack-core`:
//!
//! - [`NotificationStore`]: ordered session records with lifecycle status
//! - [`ReconnectSupervisor`]: connection phase, retry count, linear backoff
//! - [`KeepaliveMonitor`]: periodic ping bound to one channel instance
//! - [`ToastRenderer`]: toast arena, reveal and idempotent removal
//! - [`ChannelClient`]: the orchestrator that wires them to a channel
//!
//! Nothing here performs I/O. Production handlers live in
//! `supplytrack-effects`; deterministic handlers for tests live in
//! `supplytrack-testkit`.

#![forbid(unsafe_code)]

pub mod client;
pub mod keepalive;
pub mod renderer;
pub mod store;
pub mod supervisor;

pub use client::{ChannelClient, ClientParts, ClientStats};
pub use keepalive::{KeepaliveMonitor, ProbeOutcome};
pub use renderer::{DismissCause, ToastRenderer};
pub use store::{NotificationStore, ResolveOutcome};
pub use supervisor::{
    BackoffPolicy, ConnectionPhase, ReconnectDecision, ReconnectStats, ReconnectSupervisor,
};

//! Effect interfaces for the notification pipeline
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `supplytrack-effects` (production),
//!   `supplytrack-testkit` (deterministic)
//! - **Usage**: `ChannelClient` and the components it drives
//!
//! Every method here returns immediately. Work that completes later is
//! reported to the client as a `ClientInput`, so the client itself never
//! awaits and can run on a single cooperative thread.

pub mod channel;
pub mod surface;
pub mod time;

pub use channel::{ChannelEffects, ChannelId, ChannelState, CloseReason};
pub use surface::{ToastSurface, Transition};
pub use time::{TimerEffects, TimerId, TimerTask};

//! SupplyTrack Effects - Production Effect Handlers
//!
//! Tokio-backed implementations of the `supplytrack-core` effect traits and
//! the single-threaded event loop that drives a `ChannelClient` with them:
//!
//! - [`WebSocketChannels`]: tokio-tungstenite channel handler
//! - [`TokioTimers`]: tokio sleep/interval timer handler
//! - [`TerminalSurface`]: writes revealed toasts to a terminal
//! - [`EventLoop`]: feeds handler events into the client one at a time
//!
//! Handlers never touch client state. Background tasks only produce
//! `ClientInput`s on the loop's queue.

#![forbid(unsafe_code)]

pub mod channel;
pub mod runtime;
pub mod surface;
pub mod timers;

pub use channel::WebSocketChannels;
pub use runtime::{shutdown_on, EventLoop, LiveClient};
pub use surface::TerminalSurface;
pub use timers::TokioTimers;

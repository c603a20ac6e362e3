//! SupplyTrack Testkit - Deterministic Effect Handlers
//!
//! In-memory implementations of the core effect traits. Each handler is a
//! cheap clonable handle over shared state: hand one clone to the
//! `ChannelClient` and keep another in the test to script events and
//! inspect what the client did.
//!
//! ## Usage in Tests
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! supplytrack-testkit = { path = "../supplytrack-testkit" }
//! ```
//!
//! ```rust,ignore
//! let timers = ManualTimers::new();
//! let channels = ScriptedChannels::new();
//! let surface = MemorySurface::animated();
//! let mut client = ChannelClient::from_config(&config, channels.clone(), timers.clone(), surface.clone())?;
//!
//! client.open();
//! let channel = channels.last_channel().unwrap();
//! channels.open_channel(channel);
//! client.handle(ClientInput::ChannelOpened { channel });
//!
//! timers.advance(Duration::from_secs(10), |timer, task| {
//!     client.handle(ClientInput::TimerFired { timer, task })
//! });
//! ```
//!
//! Handlers are single-threaded (`Rc<RefCell<_>>`), matching the client's
//! execution model.

#![forbid(unsafe_code)]

mod channels;
mod surface;
mod timers;

pub use channels::ScriptedChannels;
pub use surface::MemorySurface;
pub use timers::ManualTimers;

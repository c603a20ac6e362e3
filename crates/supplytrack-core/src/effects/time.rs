//! Timer effects.
//!
//! Timers never call back into the client directly. When one elapses the
//! handler delivers `ClientInput::TimerFired { timer, task }`, and the client
//! decides whether the task is still current.

use super::channel::ChannelId;
use crate::toast::ToastId;
use std::fmt;
use std::time::Duration;

/// Handle for a scheduled timer. Never reused within a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Work to perform when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Keepalive probe for one channel instance
    KeepaliveTick {
        /// Channel the monitor is bound to
        channel: ChannelId,
    },
    /// Backoff elapsed; re-open the channel
    Reconnect,
    /// Next scheduling tick after insertion; flip the toast visible
    ToastReveal {
        /// Target toast
        toast: ToastId,
    },
    /// Auto-dismiss timeout
    ToastDismiss {
        /// Target toast
        toast: ToastId,
    },
}

/// Timer operations
pub trait TimerEffects {
    /// Fire `task` once after `delay`
    fn schedule_once(&mut self, delay: Duration, task: TimerTask) -> TimerId;

    /// Fire `task` every `interval` until cancelled
    fn schedule_repeating(&mut self, interval: Duration, task: TimerTask) -> TimerId;

    /// Cancel a timer. Returns `false` if it was unknown or already done.
    fn cancel(&mut self, timer: TimerId) -> bool;
}

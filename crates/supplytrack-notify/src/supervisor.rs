//! Reconnection Supervisor
//!
//! Owns the connection lifecycle state and the retry counter, and decides
//! what happens after every close:
//!
//! ```text
//!  Disconnected ──begin_connect──▶ Connecting ──on_open──▶ Open
//!                                    ▲   │                   │
//!                                    │   └──on_close(retry)──┤
//!                                    └───────on_close(retry)─┘
//!  any ──on_close(attempts exhausted)──▶ GivingUp (terminal)
//! ```
//!
//! Backoff is linear: the n-th consecutive retry waits `base_delay × n`.
//! The supervisor never schedules anything itself; the client turns a
//! [`ReconnectDecision::Retry`] into a timer.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use supplytrack_core::ReconnectSettings;
use tracing::{debug, info, warn};

/// Connection lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionPhase {
    /// Never connected, or shut down
    Disconnected,
    /// Handshake in progress or waiting out a backoff delay
    Connecting,
    /// Channel open
    Open,
    /// Attempts exhausted; no further automatic reconnects
    GivingUp,
}

/// Retry limits and delay step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Reconnect attempts before giving up
    pub max_attempts: u32,
    /// Linear backoff step
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl BackoffPolicy {
    /// Build from configuration
    pub fn from_settings(settings: &ReconnectSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: settings.base_delay(),
        }
    }

    /// Delay before the `attempt`-th reconnect (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Every delay the policy can produce, in order
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_attempts)
            .map(|attempt| self.delay_for(attempt))
            .collect()
    }
}

/// What to do after a close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Re-open after `delay`
    Retry {
        /// 1-based attempt number
        attempt: u32,
        /// Backoff delay
        delay: Duration,
    },
    /// Stop reconnecting
    GiveUp {
        /// Attempts made before giving up
        attempts: u32,
    },
}

/// Statistics for reconnection operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectStats {
    /// Successful opens, including the first
    pub opens: u64,
    /// Closes observed
    pub closes: u64,
    /// Retries handed out
    pub retries_scheduled: u64,
    /// Whether the supervisor has given up
    pub gave_up: bool,
}

/// Connection state machine
#[derive(Debug, Clone)]
pub struct ReconnectSupervisor {
    policy: BackoffPolicy,
    phase: ConnectionPhase,
    attempt: u32,
    stats: ReconnectStats,
}

impl ReconnectSupervisor {
    /// Create a supervisor in the `Disconnected` phase
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            phase: ConnectionPhase::Disconnected,
            attempt: 0,
            stats: ReconnectStats::default(),
        }
    }

    /// Create with the default policy (5 attempts, 1000 ms step)
    pub fn with_defaults() -> Self {
        Self::new(BackoffPolicy::default())
    }

    /// Current phase
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Consecutive failed attempts since the last open
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Active policy
    pub fn policy(&self) -> BackoffPolicy {
        self.policy
    }

    /// Full delay sequence of the active policy
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        self.policy.schedule()
    }

    /// Counters
    pub fn stats(&self) -> ReconnectStats {
        self.stats
    }

    /// Whether the channel is currently open
    pub fn is_open(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }

    /// Whether reconnection has been abandoned
    pub fn has_given_up(&self) -> bool {
        self.phase == ConnectionPhase::GivingUp
    }

    /// A connect is starting. Returns `false` once the supervisor has given up.
    pub fn begin_connect(&mut self) -> bool {
        if self.has_given_up() {
            debug!("connect refused: reconnect attempts exhausted");
            return false;
        }
        self.phase = ConnectionPhase::Connecting;
        true
    }

    /// The channel opened: reset the attempt counter
    pub fn on_open(&mut self) {
        if self.attempt > 0 {
            info!(attempts = self.attempt, "Notification channel recovered");
        }
        self.phase = ConnectionPhase::Open;
        self.attempt = 0;
        self.stats.opens += 1;
    }

    /// The channel closed or failed: decide whether to retry
    pub fn on_close(&mut self) -> ReconnectDecision {
        self.stats.closes += 1;

        if self.has_given_up() || self.attempt >= self.policy.max_attempts {
            if !self.has_given_up() {
                warn!(
                    attempts = self.attempt,
                    max_attempts = self.policy.max_attempts,
                    "Notification channel reconnection exhausted all retries"
                );
            }
            self.phase = ConnectionPhase::GivingUp;
            self.stats.gave_up = true;
            return ReconnectDecision::GiveUp {
                attempts: self.attempt,
            };
        }

        self.attempt += 1;
        self.phase = ConnectionPhase::Connecting;
        self.stats.retries_scheduled += 1;
        ReconnectDecision::Retry {
            attempt: self.attempt,
            delay: self.policy.delay_for(self.attempt),
        }
    }

    /// The client is shutting down; keeps `GivingUp` terminal
    pub fn on_shutdown(&mut self) {
        if !self.has_given_up() {
            self.phase = ConnectionPhase::Disconnected;
        }
    }
}

impl Default for ReconnectSupervisor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn default_backoff_is_linear() {
        let mut supervisor = ReconnectSupervisor::with_defaults();
        assert!(supervisor.begin_connect());

        let delays: Vec<_> = (0..5)
            .map(|_| match supervisor.on_close() {
                ReconnectDecision::Retry { delay, .. } => delay,
                ReconnectDecision::GiveUp { .. } => panic!("gave up early"),
            })
            .collect();
        assert_eq!(delays, vec![ms(1000), ms(2000), ms(3000), ms(4000), ms(5000)]);
        assert_eq!(delays, supervisor.backoff_schedule());

        assert_eq!(
            supervisor.on_close(),
            ReconnectDecision::GiveUp { attempts: 5 }
        );
        assert_eq!(supervisor.phase(), ConnectionPhase::GivingUp);
    }

    #[test]
    fn giving_up_is_terminal() {
        let mut supervisor = ReconnectSupervisor::new(BackoffPolicy {
            max_attempts: 1,
            base_delay: ms(10),
        });
        supervisor.begin_connect();
        assert!(matches!(supervisor.on_close(), ReconnectDecision::Retry { attempt: 1, .. }));
        assert!(matches!(supervisor.on_close(), ReconnectDecision::GiveUp { .. }));

        assert!(!supervisor.begin_connect());
        assert!(matches!(supervisor.on_close(), ReconnectDecision::GiveUp { .. }));
        supervisor.on_shutdown();
        assert!(supervisor.has_given_up());
        assert!(supervisor.stats().gave_up);
    }

    #[test]
    fn open_resets_attempts() {
        let mut supervisor = ReconnectSupervisor::with_defaults();
        supervisor.begin_connect();
        supervisor.on_close();
        supervisor.on_close();
        assert_eq!(supervisor.attempt(), 2);

        supervisor.on_open();
        assert_eq!(supervisor.attempt(), 0);
        assert!(supervisor.is_open());

        assert_eq!(
            supervisor.on_close(),
            ReconnectDecision::Retry {
                attempt: 1,
                delay: ms(1000)
            }
        );
    }

    #[test]
    fn zero_attempt_policy_gives_up_immediately() {
        let mut supervisor = ReconnectSupervisor::new(BackoffPolicy {
            max_attempts: 0,
            base_delay: ms(1000),
        });
        supervisor.begin_connect();
        assert_eq!(
            supervisor.on_close(),
            ReconnectDecision::GiveUp { attempts: 0 }
        );
    }
}

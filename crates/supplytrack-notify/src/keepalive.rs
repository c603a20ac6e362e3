//! Keepalive Monitor
//!
//! Periodic liveness probe bound to exactly one channel instance. The monitor
//! owns a repeating timer; every tick re-reads the channel state and sends a
//! ping only when the channel is open at that moment. Pongs are counted but
//! never timed: a dead peer is detected by the transport reporting closure.

use std::time::Duration;
use supplytrack_core::{
    ChannelEffects, ChannelError, ChannelId, OutboundFrame, TimerEffects, TimerId, TimerTask,
};
use tracing::{debug, trace};

/// Result of one keepalive tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A ping was queued
    Sent,
    /// The channel was not open; nothing sent
    Skipped,
    /// The transport rejected the ping
    Failed(ChannelError),
}

/// Liveness probe for one channel
#[derive(Debug)]
pub struct KeepaliveMonitor {
    channel: ChannelId,
    timer: TimerId,
    interval: Duration,
    probes_sent: u64,
    probes_skipped: u64,
    pongs: u64,
    last_pong_probe: Option<u64>,
}

impl KeepaliveMonitor {
    /// Schedule the repeating probe for `channel`
    pub fn arm<T: TimerEffects>(channel: ChannelId, interval: Duration, timers: &mut T) -> Self {
        let timer = timers.schedule_repeating(interval, TimerTask::KeepaliveTick { channel });
        debug!(%channel, %timer, interval_ms = interval.as_millis() as u64, "Keepalive armed");
        Self {
            channel,
            timer,
            interval,
            probes_sent: 0,
            probes_skipped: 0,
            pongs: 0,
            last_pong_probe: None,
        }
    }

    /// Bound channel
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Repeating timer owned by this monitor
    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// Probe interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pings queued so far
    pub fn probes_sent(&self) -> u64 {
        self.probes_sent
    }

    /// Ticks that found the channel not open
    pub fn probes_skipped(&self) -> u64 {
        self.probes_skipped
    }

    /// Pongs received
    pub fn pongs(&self) -> u64 {
        self.pongs
    }

    /// Probe count at the time of the most recent pong
    pub fn last_pong_probe(&self) -> Option<u64> {
        self.last_pong_probe
    }

    /// Whether `timer` is this monitor's timer
    pub fn owns(&self, timer: TimerId) -> bool {
        self.timer == timer
    }

    /// Run one probe
    pub fn tick<C: ChannelEffects>(&mut self, channels: &mut C) -> ProbeOutcome {
        if !channels.state(self.channel).is_open() {
            self.probes_skipped += 1;
            trace!(channel = %self.channel, "Keepalive skipped: channel not open");
            return ProbeOutcome::Skipped;
        }

        let ping = match OutboundFrame::Ping.encode() {
            Ok(text) => text,
            Err(e) => {
                return ProbeOutcome::Failed(ChannelError::SendFailed {
                    channel: self.channel,
                    message: e.to_string(),
                })
            }
        };

        match channels.send_text(self.channel, &ping) {
            Ok(()) => {
                self.probes_sent += 1;
                trace!(channel = %self.channel, probes = self.probes_sent, "Keepalive ping sent");
                ProbeOutcome::Sent
            }
            Err(e) => {
                debug!(channel = %self.channel, error = %e, "Keepalive ping failed");
                ProbeOutcome::Failed(e)
            }
        }
    }

    /// Record a pong
    pub fn acknowledge(&mut self) {
        self.pongs += 1;
        self.last_pong_probe = Some(self.probes_sent);
    }

    /// Cancel the repeating timer
    pub fn stop<T: TimerEffects>(self, timers: &mut T) {
        timers.cancel(self.timer);
        debug!(channel = %self.channel, timer = %self.timer, "Keepalive stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplytrack_testkit::{ManualTimers, ScriptedChannels};
    use supplytrack_core::Endpoint;

    fn endpoint() -> Endpoint {
        Endpoint::parse_origin("http://localhost:8000").unwrap()
    }

    #[test]
    fn pings_only_while_open() {
        let mut timers = ManualTimers::new();
        let mut channels = ScriptedChannels::new();
        let channel = channels.connect(&endpoint()).unwrap();

        let mut monitor = KeepaliveMonitor::arm(channel, Duration::from_secs(30), &mut timers);
        assert_eq!(monitor.tick(&mut channels), ProbeOutcome::Skipped);

        channels.open_channel(channel);
        assert_eq!(monitor.tick(&mut channels), ProbeOutcome::Sent);
        assert_eq!(channels.sent(channel), vec![r#"{"type":"ping"}"#.to_string()]);

        channels.mark_closed(channel);
        assert_eq!(monitor.tick(&mut channels), ProbeOutcome::Skipped);
        assert_eq!(monitor.probes_sent(), 1);
        assert_eq!(monitor.probes_skipped(), 2);
    }

    #[test]
    fn stop_cancels_the_timer() {
        let mut timers = ManualTimers::new();
        let monitor = KeepaliveMonitor::arm(ChannelId::new(1), Duration::from_secs(30), &mut timers);
        assert_eq!(timers.pending(), 1);
        monitor.stop(&mut timers);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn acknowledge_records_probe_position() {
        let mut timers = ManualTimers::new();
        let mut channels = ScriptedChannels::new();
        let channel = channels.connect(&endpoint()).unwrap();
        channels.open_channel(channel);

        let mut monitor = KeepaliveMonitor::arm(channel, Duration::from_secs(30), &mut timers);
        monitor.tick(&mut channels);
        monitor.tick(&mut channels);
        monitor.acknowledge();
        assert_eq!(monitor.pongs(), 1);
        assert_eq!(monitor.last_pong_probe(), Some(2));
    }
}

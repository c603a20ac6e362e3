//! # Channel Client
//!
//! Orchestrates one notification channel: connects, dispatches decoded
//! frames into the store and renderer, keeps the channel alive, and hands
//! closes to the reconnection supervisor.
//!
//! The client is a synchronous reactor. It never blocks or awaits; a driver
//! feeds it [`ClientInput`]s one at a time through [`ChannelClient::handle`],
//! and every effect it performs goes through the injected handlers.
//!
//! Inputs are checked for currency before they are acted on. Events for a
//! channel id the client no longer holds, keepalive ticks from a stopped
//! monitor and reconnect timers that were superseded are all ignored.

use crate::keepalive::{KeepaliveMonitor, ProbeOutcome};
use crate::renderer::{DismissCause, ToastRenderer};
use crate::store::{NotificationStore, ResolveOutcome};
use crate::supervisor::{BackoffPolicy, ConnectionPhase, ReconnectDecision, ReconnectSupervisor};
use serde::Serialize;
use std::time::Duration;
use supplytrack_core::{
    decode_flashes, decode_frame, ChannelEffects, ChannelId, ClientInput, CloseReason,
    ConfigError, Endpoint, EventBus, InboundFrame, NotificationEvent, NotificationKind,
    NotificationPayload, NotifyConfig, ProtocolError, TimerEffects, TimerId, TimerTask, ToastId,
    ToastLevel, ToastSurface,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

/// Dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    /// Frames received on the current or any earlier channel
    pub frames_received: u64,
    /// Frames that failed to decode
    pub malformed_frames: u64,
    /// Frames with an unrecognized `type`
    pub ignored_frames: u64,
    /// Restock frames rejected for reusing an id
    pub duplicate_ids: u64,
    /// Keepalive acknowledgments
    pub pongs: u64,
}

/// Collaborators a client is assembled from
#[derive(Debug)]
pub struct ClientParts<C, T, S> {
    /// Channel handler
    pub channels: C,
    /// Timer handler
    pub timers: T,
    /// Toast surface
    pub surface: S,
    /// Record store
    pub store: NotificationStore,
    /// Reconnection policy and state
    pub supervisor: ReconnectSupervisor,
    /// Toast renderer
    pub renderer: ToastRenderer,
    /// Event bus for store changes
    pub events: EventBus,
}

/// Notification channel orchestrator
#[derive(Debug)]
pub struct ChannelClient<C, T, S> {
    endpoint: Endpoint,
    keepalive_interval: Duration,
    channels: C,
    timers: T,
    surface: S,
    store: NotificationStore,
    supervisor: ReconnectSupervisor,
    renderer: ToastRenderer,
    events: EventBus,
    channel: Option<ChannelId>,
    keepalive: Option<KeepaliveMonitor>,
    reconnect_timer: Option<TimerId>,
    stats: ClientStats,
}

impl<C, T, S> ChannelClient<C, T, S>
where
    C: ChannelEffects,
    T: TimerEffects,
    S: ToastSurface,
{
    /// Assemble a client from explicit parts
    pub fn new(endpoint: Endpoint, keepalive_interval: Duration, parts: ClientParts<C, T, S>) -> Self {
        Self {
            endpoint,
            keepalive_interval,
            channels: parts.channels,
            timers: parts.timers,
            surface: parts.surface,
            store: parts.store,
            supervisor: parts.supervisor,
            renderer: parts.renderer,
            events: parts.events,
            channel: None,
            keepalive: None,
            reconnect_timer: None,
            stats: ClientStats::default(),
        }
    }

    /// Build a client from validated configuration
    pub fn from_config(
        config: &NotifyConfig,
        channels: C,
        timers: T,
        surface: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        Ok(Self::new(
            endpoint,
            config.keepalive.interval(),
            ClientParts {
                channels,
                timers,
                surface,
                store: NotificationStore::new(),
                supervisor: ReconnectSupervisor::new(BackoffPolicy::from_settings(&config.reconnect)),
                renderer: ToastRenderer::new(config.toasts.clone()),
                events: EventBus::new(config.toasts.event_buffer),
            },
        ))
    }

    /// Start connecting. Returns `true` if a connect was started.
    ///
    /// No-op while a channel is held or after the supervisor has given up.
    /// A manual open during a backoff wait supersedes the pending retry.
    pub fn open(&mut self) -> bool {
        if let Some(channel) = self.channel {
            debug!(%channel, "Open ignored: channel already held");
            return false;
        }
        if !self.supervisor.begin_connect() {
            return false;
        }
        if let Some(timer) = self.reconnect_timer.take() {
            self.timers.cancel(timer);
        }

        info!(
            endpoint = %self.endpoint,
            attempt = self.supervisor.attempt(),
            "Opening notification channel"
        );
        match self.channels.connect(&self.endpoint) {
            Ok(channel) => {
                self.channel = Some(channel);
                true
            }
            Err(e) => {
                warn!(error = %e, "Notification channel connect failed");
                self.after_close();
                false
            }
        }
    }

    /// React to one input
    pub fn handle(&mut self, input: ClientInput) {
        match input {
            ClientInput::ChannelOpened { channel } => self.on_channel_opened(channel),
            ClientInput::FrameReceived { channel, payload } => self.on_frame(channel, &payload),
            ClientInput::ChannelClosed { channel, reason } => self.on_channel_closed(channel, reason),
            ClientInput::TimerFired { timer, task } => self.on_timer(timer, task),
            ClientInput::ToastCloseClicked { toast } => {
                self.renderer.dismiss(
                    toast,
                    DismissCause::CloseClicked,
                    &mut self.surface,
                    &mut self.timers,
                );
            }
            ClientInput::ToastTransitionEnded { toast } => {
                self.renderer.transition_ended(toast, &mut self.surface);
            }
        }
    }

    /// Show an ad-hoc toast
    pub fn show_notification(&mut self, message: impl Into<String>, level: ToastLevel) -> ToastId {
        self.renderer
            .show_message(level, message, &mut self.surface, &mut self.timers)
    }

    /// Render the page's one-shot flash payload
    pub fn render_flashes(&mut self, payload: &str) -> Result<Vec<ToastId>, ProtocolError> {
        let flashes = decode_flashes(payload)?;
        Ok(flashes
            .iter()
            .map(|flash| {
                self.renderer
                    .show_flash(flash, &mut self.surface, &mut self.timers)
            })
            .collect())
    }

    /// Subscribe to store changes
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Empty the store
    pub fn clear_notifications(&mut self) {
        self.store.clear();
        self.events.publish(NotificationEvent::Cleared);
        info!("Notifications cleared");
    }

    /// Tear down every toast and the host, then empty the store
    pub fn reset(&mut self) {
        self.renderer.teardown(&mut self.surface, &mut self.timers);
        self.store.clear();
        self.events.publish(NotificationEvent::Cleared);
        info!("Notification client reset");
    }

    /// Stop keepalive, cancel any pending reconnect and close the channel
    pub fn shutdown(&mut self) {
        self.stop_keepalive();
        if let Some(timer) = self.reconnect_timer.take() {
            self.timers.cancel(timer);
        }
        if let Some(channel) = self.channel.take() {
            self.channels.close(channel);
            info!(%channel, "Notification channel closed");
        }
        self.supervisor.on_shutdown();
    }

    /// Record store
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// Reconnection supervisor
    pub fn supervisor(&self) -> &ReconnectSupervisor {
        &self.supervisor
    }

    /// Toast renderer
    pub fn renderer(&self) -> &ToastRenderer {
        &self.renderer
    }

    /// Toast surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Dispatch counters
    pub fn stats(&self) -> ClientStats {
        self.stats
    }

    /// Current lifecycle phase
    pub fn connection_phase(&self) -> ConnectionPhase {
        self.supervisor.phase()
    }

    /// Channel endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Channel currently held, if any
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Active keepalive monitor
    pub fn keepalive(&self) -> Option<&KeepaliveMonitor> {
        self.keepalive.as_ref()
    }

    /// Pending reconnect timer
    pub fn reconnect_timer(&self) -> Option<TimerId> {
        self.reconnect_timer
    }

    fn is_current(&self, channel: ChannelId) -> bool {
        self.channel == Some(channel)
    }

    fn on_channel_opened(&mut self, channel: ChannelId) {
        if !self.is_current(channel) {
            trace!(%channel, "Stale open ignored");
            return;
        }
        self.supervisor.on_open();
        self.stop_keepalive();
        self.keepalive = Some(KeepaliveMonitor::arm(
            channel,
            self.keepalive_interval,
            &mut self.timers,
        ));
        info!(%channel, endpoint = %self.endpoint, "Notification channel open");
    }

    fn on_frame(&mut self, channel: ChannelId, payload: &str) {
        if !self.is_current(channel) {
            trace!(%channel, "Frame from stale channel ignored");
            return;
        }
        self.stats.frames_received += 1;
        match decode_frame(payload) {
            Ok(frame) => self.dispatch(frame),
            Err(e) => {
                self.stats.malformed_frames += 1;
                debug!(%channel, error = %e, "Dropping malformed frame");
            }
        }
    }

    fn dispatch(&mut self, frame: InboundFrame) {
        match frame {
            InboundFrame::RestockNotification { notification } => self.on_restock(notification),
            InboundFrame::RestockResolved { notification } => self.on_resolved(notification),
            InboundFrame::Pong => {
                self.stats.pongs += 1;
                if let Some(monitor) = self.keepalive.as_mut() {
                    monitor.acknowledge();
                }
            }
            InboundFrame::Unknown => {
                self.stats.ignored_frames += 1;
                trace!("Ignoring frame of unknown type");
            }
        }
    }

    fn on_restock(&mut self, payload: NotificationPayload) {
        let record = payload.into_record(NotificationKind::Restock);
        match self.store.append(record.clone()) {
            Ok(()) => {
                debug!(id = %record.id, "Restock notification received");
                self.renderer
                    .show_record(&record, &mut self.surface, &mut self.timers);
                self.events.publish(NotificationEvent::Added(record));
            }
            Err(e) => {
                self.stats.duplicate_ids += 1;
                error!(error = %e, "Rejected restock notification");
            }
        }
    }

    fn on_resolved(&mut self, payload: NotificationPayload) {
        match self.store.resolve(&payload.id) {
            ResolveOutcome::Resolved(record) => {
                debug!(id = %record.id, "Restock notification resolved");
                self.events.publish(NotificationEvent::StatusChanged(record));
            }
            ResolveOutcome::AlreadyResolved => {
                debug!(id = %payload.id, "Resolution for already resolved notification");
            }
            ResolveOutcome::Unknown => {
                debug!(id = %payload.id, "Resolution for unknown notification");
            }
        }
        let announcement = payload.into_record(NotificationKind::Resolved);
        self.renderer
            .show_record(&announcement, &mut self.surface, &mut self.timers);
    }

    fn on_channel_closed(&mut self, channel: ChannelId, reason: CloseReason) {
        if !self.is_current(channel) {
            trace!(%channel, %reason, "Stale close ignored");
            return;
        }
        self.channel = None;
        self.stop_keepalive();
        info!(%channel, %reason, "Notification channel closed");
        self.after_close();
    }

    fn after_close(&mut self) {
        match self.supervisor.on_close() {
            ReconnectDecision::Retry { attempt, delay } => {
                let timer = self.timers.schedule_once(delay, TimerTask::Reconnect);
                self.reconnect_timer = Some(timer);
                info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Scheduling notification channel reconnect"
                );
            }
            ReconnectDecision::GiveUp { attempts } => {
                debug!(attempts, "Notification client dormant");
            }
        }
    }

    fn on_timer(&mut self, timer: TimerId, task: TimerTask) {
        match task {
            TimerTask::KeepaliveTick { channel } => match self.keepalive.as_mut() {
                Some(monitor) if monitor.owns(timer) && monitor.channel() == channel => {
                    if let ProbeOutcome::Failed(e) = monitor.tick(&mut self.channels) {
                        debug!(%channel, error = %e, "Keepalive probe failed");
                    }
                }
                _ => trace!(%timer, %channel, "Stale keepalive tick ignored"),
            },
            TimerTask::Reconnect => {
                if self.reconnect_timer == Some(timer) {
                    self.reconnect_timer = None;
                    self.open();
                } else {
                    trace!(%timer, "Stale reconnect timer ignored");
                }
            }
            TimerTask::ToastReveal { toast } => {
                self.renderer.reveal(toast, &mut self.surface);
            }
            TimerTask::ToastDismiss { toast } => {
                self.renderer.dismiss(
                    toast,
                    DismissCause::Timeout,
                    &mut self.surface,
                    &mut self.timers,
                );
            }
        }
    }

    fn stop_keepalive(&mut self) {
        if let Some(monitor) = self.keepalive.take() {
            monitor.stop(&mut self.timers);
        }
    }
}

//! # Toast Renderer
//!
//! Pure presentation: turns records, flashes and ad-hoc messages into toasts
//! on a [`ToastSurface`] and retires them again.
//!
//! Toast lifecycle:
//!
//! ```text
//! show ──insert_hidden──▶ Entering ──reveal tick──▶ Visible
//!                            │                        │
//!                            └──timeout | close click─┴──▶ Leaving ──▶ detached
//! ```
//!
//! Each toast owns one auto-dismiss timer. Whichever of the timer or a close
//! click arrives first wins; every later trigger for the same toast is a
//! no-op. The renderer never reads state back from the surface.

use std::collections::HashMap;
use std::time::Duration;
use supplytrack_core::{
    FlashMessage, NotificationKind, NotificationRecord, TimerEffects, TimerId, TimerTask,
    ToastId, ToastLevel, ToastSettings, ToastSurface, ToastView, Transition,
};
use tracing::trace;

/// What triggered a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissCause {
    /// Auto-dismiss timer fired
    Timeout,
    /// User clicked the close control
    CloseClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastPhase {
    Entering,
    Visible,
    Leaving,
}

#[derive(Debug)]
struct ActiveToast {
    phase: ToastPhase,
    reveal_timer: Option<TimerId>,
    dismiss_timer: Option<TimerId>,
}

/// Toast arena and lifecycle driver
#[derive(Debug)]
pub struct ToastRenderer {
    settings: ToastSettings,
    toasts: HashMap<ToastId, ActiveToast>,
    next_id: u64,
    host_mounted: bool,
}

impl ToastRenderer {
    /// Create a renderer with the given timeouts
    pub fn new(settings: ToastSettings) -> Self {
        Self {
            settings,
            toasts: HashMap::new(),
            next_id: 0,
            host_mounted: false,
        }
    }

    /// Presentation level for a record kind
    pub fn level_for(kind: NotificationKind) -> ToastLevel {
        match kind {
            NotificationKind::Restock => ToastLevel::Warning,
            NotificationKind::Resolved => ToastLevel::Success,
            NotificationKind::Info => ToastLevel::Info,
        }
    }

    /// Active timeouts
    pub fn settings(&self) -> &ToastSettings {
        &self.settings
    }

    /// Toasts not yet detached
    pub fn active_count(&self) -> usize {
        self.toasts.len()
    }

    /// Whether `toast` is still attached
    pub fn is_active(&self, toast: ToastId) -> bool {
        self.toasts.contains_key(&toast)
    }

    /// Whether the shared host exists
    pub fn host_mounted(&self) -> bool {
        self.host_mounted
    }

    /// Show a record, classified by its kind
    pub fn show_record<S: ToastSurface, T: TimerEffects>(
        &mut self,
        record: &NotificationRecord,
        surface: &mut S,
        timers: &mut T,
    ) -> ToastId {
        let level = Self::level_for(record.kind);
        let timeout = self.settings.timeout_for(level);
        self.show(level, record.message.clone(), timeout, surface, timers)
    }

    /// Show an ad-hoc message with the level's default timeout
    pub fn show_message<S: ToastSurface, T: TimerEffects>(
        &mut self,
        level: ToastLevel,
        message: impl Into<String>,
        surface: &mut S,
        timers: &mut T,
    ) -> ToastId {
        let timeout = self.settings.timeout_for(level);
        self.show(level, message, timeout, surface, timers)
    }

    /// Show a page flash with the uniform flash timeout
    pub fn show_flash<S: ToastSurface, T: TimerEffects>(
        &mut self,
        flash: &FlashMessage,
        surface: &mut S,
        timers: &mut T,
    ) -> ToastId {
        let timeout = self.settings.flash_timeout();
        self.show(flash.level(), flash.message.clone(), timeout, surface, timers)
    }

    /// Insert a toast hidden, then schedule its reveal and auto-dismiss
    pub fn show<S: ToastSurface, T: TimerEffects>(
        &mut self,
        level: ToastLevel,
        message: impl Into<String>,
        timeout: Duration,
        surface: &mut S,
        timers: &mut T,
    ) -> ToastId {
        if !self.host_mounted {
            surface.mount_host();
            self.host_mounted = true;
        }

        self.next_id += 1;
        let toast = ToastId::new(self.next_id);
        let view = ToastView {
            level,
            message: message.into(),
            timeout,
            closable: true,
        };
        surface.insert_hidden(toast, &view);

        let reveal_timer = timers.schedule_once(Duration::ZERO, TimerTask::ToastReveal { toast });
        let dismiss_timer = timers.schedule_once(timeout, TimerTask::ToastDismiss { toast });
        self.toasts.insert(
            toast,
            ActiveToast {
                phase: ToastPhase::Entering,
                reveal_timer: Some(reveal_timer),
                dismiss_timer: Some(dismiss_timer),
            },
        );
        trace!(%toast, class = level.class_name(), timeout_ms = timeout.as_millis() as u64, "Toast shown");
        toast
    }

    /// Reveal tick for a toast still entering
    pub fn reveal<S: ToastSurface>(&mut self, toast: ToastId, surface: &mut S) -> bool {
        match self.toasts.get_mut(&toast) {
            Some(active) if active.phase == ToastPhase::Entering => {
                active.phase = ToastPhase::Visible;
                active.reveal_timer = None;
                surface.reveal(toast);
                true
            }
            _ => false,
        }
    }

    /// Begin removing a toast. Returns `false` if it is already leaving or gone.
    pub fn dismiss<S: ToastSurface, T: TimerEffects>(
        &mut self,
        toast: ToastId,
        cause: DismissCause,
        surface: &mut S,
        timers: &mut T,
    ) -> bool {
        let Some(active) = self.toasts.get_mut(&toast) else {
            trace!(%toast, ?cause, "Dismiss for unknown toast ignored");
            return false;
        };
        if active.phase == ToastPhase::Leaving {
            return false;
        }

        if let Some(timer) = active.reveal_timer.take() {
            timers.cancel(timer);
        }
        if let Some(timer) = active.dismiss_timer.take() {
            // An expired one-shot timer is already gone from the handler
            if cause == DismissCause::CloseClicked {
                timers.cancel(timer);
            }
        }
        active.phase = ToastPhase::Leaving;
        trace!(%toast, ?cause, "Toast dismissed");

        match surface.hide(toast) {
            Transition::Immediate => self.detach(toast, surface),
            Transition::Animated => {}
        }
        true
    }

    /// Hide transition finished; detach a leaving toast
    pub fn transition_ended<S: ToastSurface>(&mut self, toast: ToastId, surface: &mut S) -> bool {
        let leaving = self
            .toasts
            .get(&toast)
            .is_some_and(|active| active.phase == ToastPhase::Leaving);
        if leaving {
            self.detach(toast, surface);
        }
        leaving
    }

    /// Cancel every toast timer, detach every toast and remove the host
    pub fn teardown<S: ToastSurface, T: TimerEffects>(&mut self, surface: &mut S, timers: &mut T) {
        let mut ids: Vec<_> = self.toasts.keys().copied().collect();
        ids.sort();
        for toast in ids {
            if let Some(active) = self.toasts.remove(&toast) {
                for timer in [active.reveal_timer, active.dismiss_timer].into_iter().flatten() {
                    timers.cancel(timer);
                }
                surface.detach(toast);
            }
        }
        if self.host_mounted {
            surface.unmount_host();
            self.host_mounted = false;
        }
    }

    fn detach<S: ToastSurface>(&mut self, toast: ToastId, surface: &mut S) {
        if self.toasts.remove(&toast).is_some() {
            surface.detach(toast);
        }
    }
}

impl Default for ToastRenderer {
    fn default() -> Self {
        Self::new(ToastSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplytrack_testkit::{ManualTimers, MemorySurface};

    fn fire(renderer: &mut ToastRenderer, surface: &mut MemorySurface, timers: &mut ManualTimers, by: Duration) {
        let clock = timers.clone();
        clock.advance(by, |_, task| match task {
            TimerTask::ToastReveal { toast } => {
                renderer.reveal(toast, surface);
            }
            TimerTask::ToastDismiss { toast } => {
                renderer.dismiss(toast, DismissCause::Timeout, surface, timers);
            }
            _ => {}
        });
    }

    #[test]
    fn kinds_map_to_single_levels() {
        assert_eq!(ToastRenderer::level_for(NotificationKind::Restock), ToastLevel::Warning);
        assert_eq!(ToastRenderer::level_for(NotificationKind::Resolved), ToastLevel::Success);
        assert_eq!(ToastRenderer::level_for(NotificationKind::Info), ToastLevel::Info);
    }

    #[test]
    fn toast_is_inserted_hidden_then_revealed() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::animated();
        let mut timers = ManualTimers::new();

        let toast = renderer.show_message(ToastLevel::Info, "hello", &mut surface, &mut timers);
        assert!(surface.host_mounted());
        assert!(!surface.is_visible(toast));

        fire(&mut renderer, &mut surface, &mut timers, Duration::ZERO);
        assert!(surface.is_visible(toast));
        assert_eq!(surface.view(toast).unwrap().timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn host_is_created_once() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::immediate();
        let mut timers = ManualTimers::new();

        renderer.show_message(ToastLevel::Info, "one", &mut surface, &mut timers);
        renderer.show_message(ToastLevel::Info, "two", &mut surface, &mut timers);
        assert_eq!(surface.host_mounts(), 1);
        assert_eq!(surface.attached(), 2);
    }

    #[test]
    fn click_then_timeout_detaches_once() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::animated();
        let mut timers = ManualTimers::new();

        let toast = renderer.show_message(ToastLevel::Warning, "low stock", &mut surface, &mut timers);
        fire(&mut renderer, &mut surface, &mut timers, Duration::ZERO);

        assert!(renderer.dismiss(toast, DismissCause::CloseClicked, &mut surface, &mut timers));
        assert!(!renderer.dismiss(toast, DismissCause::CloseClicked, &mut surface, &mut timers));
        assert!(renderer.transition_ended(toast, &mut surface));
        assert!(!renderer.transition_ended(toast, &mut surface));

        // The dismiss timer was cancelled by the click
        fire(&mut renderer, &mut surface, &mut timers, Duration::from_secs(20));
        assert!(!renderer.dismiss(toast, DismissCause::Timeout, &mut surface, &mut timers));
        assert_eq!(surface.detach_count(toast), 1);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn immediate_surface_detaches_on_timeout() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::immediate();
        let mut timers = ManualTimers::new();

        let flash = FlashMessage {
            message: "Saved".to_string(),
            tags: "success".to_string(),
        };
        let toast = renderer.show_flash(&flash, &mut surface, &mut timers);
        assert_eq!(surface.view(toast).unwrap().level, ToastLevel::Success);

        fire(&mut renderer, &mut surface, &mut timers, Duration::from_millis(2_999));
        assert!(renderer.is_active(toast));
        fire(&mut renderer, &mut surface, &mut timers, Duration::from_millis(1));
        assert!(!renderer.is_active(toast));
        assert_eq!(surface.detach_count(toast), 1);
    }

    #[test]
    fn dismiss_before_reveal_cancels_reveal() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::immediate();
        let mut timers = ManualTimers::new();

        let toast = renderer.show_message(ToastLevel::Info, "quick", &mut surface, &mut timers);
        renderer.dismiss(toast, DismissCause::CloseClicked, &mut surface, &mut timers);
        assert_eq!(timers.pending(), 0);
        assert!(!renderer.reveal(toast, &mut surface));
    }

    #[test]
    fn teardown_cancels_timers_and_removes_host() {
        let mut renderer = ToastRenderer::default();
        let mut surface = MemorySurface::animated();
        let mut timers = ManualTimers::new();

        let first = renderer.show_message(ToastLevel::Info, "a", &mut surface, &mut timers);
        let second = renderer.show_message(ToastLevel::Success, "b", &mut surface, &mut timers);
        renderer.teardown(&mut surface, &mut timers);

        assert_eq!(timers.pending(), 0);
        assert_eq!(renderer.active_count(), 0);
        assert!(!surface.host_mounted());
        assert_eq!(surface.detach_count(first), 1);
        assert_eq!(surface.detach_count(second), 1);

        renderer.show_message(ToastLevel::Info, "c", &mut surface, &mut timers);
        assert_eq!(surface.host_mounts(), 2);
    }
}

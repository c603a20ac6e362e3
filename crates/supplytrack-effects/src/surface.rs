//! Terminal toast surface
//!
//! Prints each toast as one line when it is revealed, e.g. `⚠ Widget low`.
//! A terminal has no hide animation, so `hide` always reports
//! [`Transition::Immediate`].

use std::collections::HashMap;
use std::io::Write;
use supplytrack_core::{ToastId, ToastSurface, ToastView, Transition};
use tracing::warn;

/// Line-oriented toast surface over any writer
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
    pending: HashMap<ToastId, ToastView>,
    revealed: usize,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: HashMap::new(),
            revealed: 0,
        }
    }

    /// Toasts printed so far
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Consume the surface, returning the writer
    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> ToastSurface for TerminalSurface<W> {
    fn mount_host(&mut self) {}

    fn unmount_host(&mut self) {
        self.pending.clear();
    }

    fn insert_hidden(&mut self, toast: ToastId, view: &ToastView) {
        self.pending.insert(toast, view.clone());
    }

    fn reveal(&mut self, toast: ToastId) {
        let Some(view) = self.pending.remove(&toast) else {
            return;
        };
        let written = writeln!(self.out, "{} {}", view.icon(), view.message)
            .and_then(|()| self.out.flush());
        match written {
            Ok(()) => self.revealed += 1,
            Err(e) => warn!(%toast, error = %e, "Failed to write toast"),
        }
    }

    fn hide(&mut self, toast: ToastId) -> Transition {
        self.pending.remove(&toast);
        Transition::Immediate
    }

    fn detach(&mut self, toast: ToastId) {
        self.pending.remove(&toast);
    }
}

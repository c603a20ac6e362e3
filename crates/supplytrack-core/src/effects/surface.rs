//! Toast surface effects: the host element toasts are attached to.

use crate::toast::{ToastId, ToastView};

/// What happens after a toast is hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The surface animates; it will report `ToastTransitionEnded` later
    Animated,
    /// No animation; the toast may be detached right away
    Immediate,
}

/// Presentation host operations.
///
/// The renderer guarantees that `reveal`, `hide` and `detach` are only called
/// for toasts it inserted, and `detach` at most once per toast.
pub trait ToastSurface {
    /// Create the shared toast host. Called at most once until `unmount_host`.
    fn mount_host(&mut self);

    /// Remove the shared toast host
    fn unmount_host(&mut self);

    /// Append a toast in its hidden state
    fn insert_hidden(&mut self, toast: ToastId, view: &ToastView);

    /// Flip a toast to its visible state
    fn reveal(&mut self, toast: ToastId);

    /// Flip a toast to its hidden state
    fn hide(&mut self, toast: ToastId) -> Transition;

    /// Remove a toast from the host
    fn detach(&mut self, toast: ToastId);
}

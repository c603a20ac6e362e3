//! In-memory toast surface

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use supplytrack_core::{ToastId, ToastSurface, ToastView, Transition};

#[derive(Debug)]
struct MountedToast {
    view: ToastView,
    visible: bool,
}

#[derive(Debug)]
struct SurfaceState {
    transition: Transition,
    host_mounted: bool,
    host_mounts: usize,
    toasts: BTreeMap<ToastId, MountedToast>,
    detaches: HashMap<ToastId, usize>,
}

/// Surface that records every call for inspection
#[derive(Debug, Clone)]
pub struct MemorySurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl MemorySurface {
    fn with_transition(transition: Transition) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                transition,
                host_mounted: false,
                host_mounts: 0,
                toasts: BTreeMap::new(),
                detaches: HashMap::new(),
            })),
        }
    }

    /// Surface whose hide transition must be ended by the test
    pub fn animated() -> Self {
        Self::with_transition(Transition::Animated)
    }

    /// Surface without hide animations
    pub fn immediate() -> Self {
        Self::with_transition(Transition::Immediate)
    }

    /// Whether the host currently exists
    pub fn host_mounted(&self) -> bool {
        self.state.borrow().host_mounted
    }

    /// Times the host was created
    pub fn host_mounts(&self) -> usize {
        self.state.borrow().host_mounts
    }

    /// Toasts currently attached
    pub fn attached(&self) -> usize {
        self.state.borrow().toasts.len()
    }

    /// View of an attached toast
    pub fn view(&self, toast: ToastId) -> Option<ToastView> {
        self.state
            .borrow()
            .toasts
            .get(&toast)
            .map(|mounted| mounted.view.clone())
    }

    /// Whether an attached toast is in its visible state
    pub fn is_visible(&self, toast: ToastId) -> bool {
        self.state
            .borrow()
            .toasts
            .get(&toast)
            .is_some_and(|mounted| mounted.visible)
    }

    /// Views of visible toasts, oldest first
    pub fn visible(&self) -> Vec<ToastView> {
        self.state
            .borrow()
            .toasts
            .values()
            .filter(|mounted| mounted.visible)
            .map(|mounted| mounted.view.clone())
            .collect()
    }

    /// Times `toast` was detached
    pub fn detach_count(&self, toast: ToastId) -> usize {
        self.state
            .borrow()
            .detaches
            .get(&toast)
            .copied()
            .unwrap_or(0)
    }
}

impl ToastSurface for MemorySurface {
    fn mount_host(&mut self) {
        let mut state = self.state.borrow_mut();
        state.host_mounted = true;
        state.host_mounts += 1;
    }

    fn unmount_host(&mut self) {
        self.state.borrow_mut().host_mounted = false;
    }

    fn insert_hidden(&mut self, toast: ToastId, view: &ToastView) {
        self.state.borrow_mut().toasts.insert(
            toast,
            MountedToast {
                view: view.clone(),
                visible: false,
            },
        );
    }

    fn reveal(&mut self, toast: ToastId) {
        if let Some(mounted) = self.state.borrow_mut().toasts.get_mut(&toast) {
            mounted.visible = true;
        }
    }

    fn hide(&mut self, toast: ToastId) -> Transition {
        let mut state = self.state.borrow_mut();
        if let Some(mounted) = state.toasts.get_mut(&toast) {
            mounted.visible = false;
        }
        state.transition
    }

    fn detach(&mut self, toast: ToastId) {
        let mut state = self.state.borrow_mut();
        state.toasts.remove(&toast);
        *state.detaches.entry(toast).or_insert(0) += 1;
    }
}

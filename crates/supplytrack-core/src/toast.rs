//! Toast presentation types
//!
//! Shared between the renderer (which decides *what* to show) and surface
//! handlers (which decide *how* it looks).

use std::fmt;
use std::time::Duration;

/// Toast severity level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    /// Neutral information
    #[default]
    Info,
    /// Something completed or was resolved
    Success,
    /// Attention needed
    Warning,
    /// Something failed (flash path only)
    Error,
}

impl ToastLevel {
    /// Fixed icon for this level
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }

    /// CSS-style class name
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Renderer-assigned toast handle. Never reused within a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Everything a surface needs to draw one toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    /// Presentation class
    pub level: ToastLevel,
    /// Message text
    pub message: String,
    /// Auto-dismiss delay
    pub timeout: Duration,
    /// Whether the toast shows a close control
    pub closable: bool,
}

impl ToastView {
    /// Icon for the view's level
    pub fn icon(&self) -> &'static str {
        self.level.icon()
    }
}

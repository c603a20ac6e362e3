//! Client inputs
//!
//! Each variant corresponds to one resumption point of the cooperative
//! execution model: a channel event, an elapsed timer, or a user/UI event.

use crate::effects::{ChannelId, CloseReason, TimerId, TimerTask};
use crate::toast::ToastId;

/// One reaction-triggering event, delivered to the client in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInput {
    /// Handshake completed
    ChannelOpened {
        /// Channel that opened
        channel: ChannelId,
    },
    /// Inbound frame payload (binary frames arrive lossily decoded)
    FrameReceived {
        /// Source channel
        channel: ChannelId,
        /// Raw frame text
        payload: String,
    },
    /// Channel closed or failed
    ChannelClosed {
        /// Channel that closed
        channel: ChannelId,
        /// Why it closed
        reason: CloseReason,
    },
    /// Timer elapsed
    TimerFired {
        /// Timer handle
        timer: TimerId,
        /// Scheduled work
        task: TimerTask,
    },
    /// User clicked a toast's close control
    ToastCloseClicked {
        /// Target toast
        toast: ToastId,
    },
    /// A toast's hide transition finished
    ToastTransitionEnded {
        /// Target toast
        toast: ToastId,
    },
}

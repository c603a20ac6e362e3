//! Scripted in-memory channel handler

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use supplytrack_core::{ChannelEffects, ChannelError, ChannelId, ChannelState, Endpoint};

#[derive(Debug)]
struct ScriptedChannel {
    endpoint: String,
    state: ChannelState,
    sent: Vec<String>,
}

#[derive(Debug, Default)]
struct ChannelsState {
    next_id: u64,
    channels: BTreeMap<ChannelId, ScriptedChannel>,
    connect_failure: Option<String>,
    close_requests: Vec<ChannelId>,
}

/// Channel handler whose lifecycle is driven by the test.
///
/// `connect` creates a channel in `Connecting`; the test moves it along with
/// [`open_channel`](Self::open_channel) / [`mark_closed`](Self::mark_closed)
/// and then delivers the matching `ClientInput` itself.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChannels {
    state: Rc<RefCell<ChannelsState>>,
}

impl ScriptedChannels {
    /// Create a handler with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `connect` calls that produced a channel
    pub fn connect_count(&self) -> usize {
        self.state.borrow().channels.len()
    }

    /// Most recently created channel
    pub fn last_channel(&self) -> Option<ChannelId> {
        self.state.borrow().channels.keys().next_back().copied()
    }

    /// Endpoint a channel was opened against
    pub fn endpoint_of(&self, channel: ChannelId) -> Option<String> {
        self.state
            .borrow()
            .channels
            .get(&channel)
            .map(|scripted| scripted.endpoint.clone())
    }

    /// Complete the handshake
    pub fn open_channel(&self, channel: ChannelId) {
        self.set_state(channel, ChannelState::Open);
    }

    /// Drop the connection without telling the client
    pub fn mark_closed(&self, channel: ChannelId) {
        self.set_state(channel, ChannelState::Closed);
    }

    /// Frames the client sent on `channel`
    pub fn sent(&self, channel: ChannelId) -> Vec<String> {
        self.state
            .borrow()
            .channels
            .get(&channel)
            .map(|scripted| scripted.sent.clone())
            .unwrap_or_default()
    }

    /// Make the next `connect` fail synchronously
    pub fn fail_next_connect(&self, message: impl Into<String>) {
        self.state.borrow_mut().connect_failure = Some(message.into());
    }

    /// Channels the client asked to close
    pub fn close_requests(&self) -> Vec<ChannelId> {
        self.state.borrow().close_requests.clone()
    }

    fn set_state(&self, channel: ChannelId, new_state: ChannelState) {
        if let Some(scripted) = self.state.borrow_mut().channels.get_mut(&channel) {
            scripted.state = new_state;
        }
    }
}

impl ChannelEffects for ScriptedChannels {
    fn connect(&mut self, endpoint: &Endpoint) -> Result<ChannelId, ChannelError> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.connect_failure.take() {
            return Err(ChannelError::ConnectFailed { message });
        }
        state.next_id += 1;
        let id = ChannelId::new(state.next_id);
        state.channels.insert(
            id,
            ScriptedChannel {
                endpoint: endpoint.as_str().to_string(),
                state: ChannelState::Connecting,
                sent: Vec::new(),
            },
        );
        Ok(id)
    }

    fn state(&self, channel: ChannelId) -> ChannelState {
        self.state
            .borrow()
            .channels
            .get(&channel)
            .map_or(ChannelState::Closed, |scripted| scripted.state)
    }

    fn send_text(&mut self, channel: ChannelId, text: &str) -> Result<(), ChannelError> {
        let mut state = self.state.borrow_mut();
        match state.channels.get_mut(&channel) {
            Some(scripted) if scripted.state.is_open() => {
                scripted.sent.push(text.to_string());
                Ok(())
            }
            _ => Err(ChannelError::NotOpen { channel }),
        }
    }

    fn close(&mut self, channel: ChannelId) {
        let mut state = self.state.borrow_mut();
        state.close_requests.push(channel);
        if let Some(scripted) = state.channels.get_mut(&channel) {
            scripted.state = ChannelState::Closed;
        }
    }
}

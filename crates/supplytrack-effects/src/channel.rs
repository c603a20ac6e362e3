//! WebSocket Channel Handler
//!
//! One spawned task per channel runs the handshake (bounded by the connect
//! timeout), then pumps inbound frames to the event loop and outbound frames
//! to the socket until either side closes. The task reports exactly one
//! `ChannelOpened` (on success) and exactly one `ChannelClosed`.
//!
//! Channel state is shared with the task so `state()` reflects the
//! transport at call time.

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use supplytrack_core::{
    ChannelEffects, ChannelError, ChannelId, ChannelState, ClientInput, CloseReason, Endpoint,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, trace};

#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

#[derive(Debug)]
struct ChannelSlot {
    state: Arc<Mutex<ChannelState>>,
    outbound: UnboundedSender<Outbound>,
    task: JoinHandle<()>,
}

/// tokio-tungstenite channel handler
#[derive(Debug)]
pub struct WebSocketChannels {
    handle: Handle,
    inputs: UnboundedSender<ClientInput>,
    connect_timeout: Duration,
    next_id: u64,
    slots: HashMap<ChannelId, ChannelSlot>,
}

impl WebSocketChannels {
    /// Create a handler spawning onto `handle` and posting to `inputs`
    pub fn new(handle: Handle, inputs: UnboundedSender<ClientInput>, connect_timeout: Duration) -> Self {
        Self {
            handle,
            inputs,
            connect_timeout,
            next_id: 0,
            slots: HashMap::new(),
        }
    }

    fn reap(&mut self) {
        self.slots.retain(|_, slot| !slot.task.is_finished());
    }
}

impl ChannelEffects for WebSocketChannels {
    fn connect(&mut self, endpoint: &Endpoint) -> Result<ChannelId, ChannelError> {
        self.reap();
        self.next_id += 1;
        let channel = ChannelId::new(self.next_id);

        let state = Arc::new(Mutex::new(ChannelState::Connecting));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let task = self.handle.spawn(run_channel(
            channel,
            endpoint.as_str().to_string(),
            self.connect_timeout,
            Arc::clone(&state),
            outbound_rx,
            self.inputs.clone(),
        ));
        self.slots.insert(
            channel,
            ChannelSlot {
                state,
                outbound,
                task,
            },
        );
        debug!(%channel, %endpoint, "WebSocket connect started");
        Ok(channel)
    }

    fn state(&self, channel: ChannelId) -> ChannelState {
        self.slots
            .get(&channel)
            .map_or(ChannelState::Closed, |slot| *slot.state.lock())
    }

    fn send_text(&mut self, channel: ChannelId, text: &str) -> Result<(), ChannelError> {
        let slot = self
            .slots
            .get(&channel)
            .filter(|slot| slot.state.lock().is_open())
            .ok_or(ChannelError::NotOpen { channel })?;
        slot.outbound
            .send(Outbound::Text(text.to_string()))
            .map_err(|e| ChannelError::SendFailed {
                channel,
                message: e.to_string(),
            })
    }

    fn close(&mut self, channel: ChannelId) {
        let Some(slot) = self.slots.get(&channel) else {
            return;
        };
        let mut state = slot.state.lock();
        match *state {
            ChannelState::Connecting => {
                slot.task.abort();
                *state = ChannelState::Closed;
            }
            ChannelState::Open => {
                *state = ChannelState::Closing;
                let _ = slot.outbound.send(Outbound::Close);
            }
            ChannelState::Closing | ChannelState::Closed => {}
        }
    }
}

impl Drop for WebSocketChannels {
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.task.abort();
        }
    }
}

async fn run_channel(
    channel: ChannelId,
    url: String,
    connect_timeout: Duration,
    state: Arc<Mutex<ChannelState>>,
    mut outbound: UnboundedReceiver<Outbound>,
    inputs: UnboundedSender<ClientInput>,
) {
    let reason = match timeout(connect_timeout, connect_async(url.as_str())).await {
        Ok(Ok((stream, _response))) => {
            *state.lock() = ChannelState::Open;
            if inputs.send(ClientInput::ChannelOpened { channel }).is_err() {
                return;
            }
            pump(channel, stream, &state, &mut outbound, &inputs).await
        }
        Ok(Err(e)) => CloseReason::Error {
            message: format!("WebSocket connect failed: {e}"),
        },
        Err(_) => CloseReason::Error {
            message: "WebSocket connect timeout".to_string(),
        },
    };

    *state.lock() = ChannelState::Closed;
    debug!(%channel, %reason, "WebSocket channel finished");
    let _ = inputs.send(ClientInput::ChannelClosed { channel, reason });
}

async fn pump<S>(
    channel: ChannelId,
    stream: tokio_tungstenite::WebSocketStream<S>,
    state: &Mutex<ChannelState>,
    outbound: &mut UnboundedReceiver<Outbound>,
    inputs: &UnboundedSender<ClientInput>,
) -> CloseReason
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(payload))) => {
                    let _ = inputs.send(ClientInput::FrameReceived { channel, payload });
                }
                Some(Ok(Message::Binary(data))) => {
                    let payload = String::from_utf8_lossy(&data).into_owned();
                    let _ = inputs.send(ClientInput::FrameReceived { channel, payload });
                }
                Some(Ok(Message::Close(frame))) => {
                    return match frame {
                        Some(frame) => CloseReason::Remote {
                            code: Some(u16::from(frame.code)),
                            reason: frame.reason.into_owned(),
                        },
                        None => CloseReason::Remote {
                            code: None,
                            reason: String::new(),
                        },
                    };
                }
                // Control frames are answered by tungstenite itself
                Some(Ok(_)) => trace!(%channel, "Control frame"),
                Some(Err(e)) => {
                    return CloseReason::Error {
                        message: format!("WebSocket receive failed: {e}"),
                    };
                }
                None => {
                    return CloseReason::Remote {
                        code: None,
                        reason: "connection ended".to_string(),
                    };
                }
            },
            command = outbound.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        return CloseReason::Error {
                            message: format!("WebSocket send failed: {e}"),
                        };
                    }
                }
                Some(Outbound::Close) | None => {
                    *state.lock() = ChannelState::Closing;
                    let _ = sink.send(Message::Close(None)).await;
                    return CloseReason::Local;
                }
            },
        }
    }
}

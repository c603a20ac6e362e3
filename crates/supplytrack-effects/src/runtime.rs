//! Single-threaded event loop
//!
//! Owns the client and the input queue every handler posts to. Inputs are
//! handled strictly one at a time, in arrival order, so client reactions
//! never interleave.

use crate::channel::WebSocketChannels;
use crate::surface::TerminalSurface;
use crate::timers::TokioTimers;
use std::future::Future;
use std::io::{self, Write};
use supplytrack_core::{ClientInput, ConfigError, NotifyConfig};
use supplytrack_notify::ChannelClient;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Client wired to the production handlers
pub type LiveClient<W> = ChannelClient<WebSocketChannels, TokioTimers, TerminalSurface<W>>;

/// Driver for a [`LiveClient`]
#[derive(Debug)]
pub struct EventLoop<W: Write> {
    client: LiveClient<W>,
    sender: UnboundedSender<ClientInput>,
    inputs: UnboundedReceiver<ClientInput>,
}

impl<W: Write> EventLoop<W> {
    /// Build the client and its handlers on `handle`
    pub fn new(
        config: &NotifyConfig,
        surface: TerminalSurface<W>,
        handle: Handle,
    ) -> Result<Self, ConfigError> {
        let (sender, inputs) = mpsc::unbounded_channel();
        let channels = WebSocketChannels::new(
            handle.clone(),
            sender.clone(),
            config.reconnect.connect_timeout(),
        );
        let timers = TokioTimers::new(handle, sender.clone());
        let client = ChannelClient::from_config(config, channels, timers, surface)?;
        Ok(Self {
            client,
            sender,
            inputs,
        })
    }

    /// Queue for injecting inputs from outside the loop
    pub fn input_sender(&self) -> UnboundedSender<ClientInput> {
        self.sender.clone()
    }

    /// The driven client
    pub fn client(&self) -> &LiveClient<W> {
        &self.client
    }

    /// The driven client, for one-shot calls such as flash rendering
    pub fn client_mut(&mut self) -> &mut LiveClient<W> {
        &mut self.client
    }

    /// Open the channel and handle inputs until `shutdown` completes, then
    /// shut the client down.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.client.open();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                input = self.inputs.recv() => match input {
                    Some(input) => {
                        debug!(?input, "Handling input");
                        self.client.handle(input);
                    }
                    None => break,
                },
            }
        }

        self.client.shutdown();
    }
}

/// Resolve when `signal` delivers. A signal that fails to register is logged
/// and never resolves, so the loop keeps running rather than stopping at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
}

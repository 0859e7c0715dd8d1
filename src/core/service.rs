//! Network control service facade

use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    backend::NetworkBackend,
    core::{
        channel::Published,
        executor,
        notifier::StateNotifier,
        types::{Capabilities, NetworkState},
    },
    protocol::{Command, Response},
};

/// Network control service facade
///
/// Bridges command writes to the backend and exposes two independent
/// channels: `responses` carries request acceptance, `state` carries the
/// actual network state.
pub struct NetworkService<B: NetworkBackend> {
    backend: Arc<B>,
    responses: Arc<Published<Response>>,
    state: Arc<Published<NetworkState>>,
    processing: Mutex<()>,
}

impl<B: NetworkBackend> NetworkService<B> {
    /// Create a new network service
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            responses: Arc::new(Published::new()),
            state: Arc::new(Published::new()),
            processing: Mutex::new(()),
        }
    }

    /// Process one raw command value
    ///
    /// Commands are handled one at a time in arrival order. Each command is
    /// an independent transaction; nothing waits for a dispatched request to
    /// take effect. The response is returned to the caller only.
    pub async fn execute_command(&self, value: &[u8]) -> Response {
        let _guard = self.processing.lock().await;

        let command = Command::decode(value);
        debug!(?command, value = %hex::encode(value), "Command received");

        let response = match command {
            Command::Invalid => executor::execute(command, Capabilities::NONE, &*self.backend).await,
            _ => {
                let capabilities = Capabilities::read(&*self.backend).await;
                executor::execute(command, capabilities, &*self.backend).await
            }
        };

        info!(?command, ?response, "Command processed");
        response
    }

    /// Process one command characteristic write and publish its response
    pub async fn handle_command_write(&self, value: &[u8]) -> Response {
        let response = self.execute_command(value).await;
        self.responses.publish(response);
        response
    }

    /// Read the current network state from the backend
    pub async fn current_state(&self) -> NetworkState {
        NetworkState::read(&*self.backend).await
    }

    /// Response channel, updated once per command characteristic write
    pub fn responses(&self) -> &Published<Response> {
        &self.responses
    }

    /// State channel, updated by the state notifier
    pub fn state(&self) -> &Published<NetworkState> {
        &self.state
    }

    /// Start republishing backend state changes
    pub async fn spawn_state_notifier(&self) -> JoinHandle<()> {
        let notifier = StateNotifier::new(self.backend.clone(), self.state.clone()).await;
        tokio::spawn(notifier.run())
    }
}

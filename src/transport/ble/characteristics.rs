//! BLE characteristic handlers

use bluer::gatt::local::{CharacteristicNotifier, ReqError};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::{
    backend::NetworkBackend,
    core::{service::NetworkService, types::NetworkState},
};

/// Characteristic handler for BLE operations
///
/// Holds no per-client state; every read goes to the service.
pub struct CharacteristicHandler<B: NetworkBackend> {
    service: Arc<NetworkService<B>>,
}

impl<B: NetworkBackend> CharacteristicHandler<B> {
    /// Create a new characteristic handler
    pub fn new(service: Arc<NetworkService<B>>) -> Self {
        Self { service }
    }

    /// Handle command write
    ///
    /// Never rejected at the ATT layer: the outcome goes to the response
    /// characteristic.
    pub async fn handle_command_write(&self, value: Vec<u8>) -> Result<(), ReqError> {
        debug!("Command write received ({} bytes)", value.len());
        self.service.handle_command_write(&value).await;
        Ok(())
    }

    /// Handle response read (empty until the first command)
    pub async fn handle_response_read(&self) -> Result<Vec<u8>, ReqError> {
        let value = self
            .service
            .responses()
            .latest()
            .map(|response| response.encode().to_vec())
            .unwrap_or_default();

        debug!("Response read: {}", hex::encode(&value));
        Ok(value)
    }

    /// Handle state read
    pub async fn handle_state_read(&self) -> Result<Vec<u8>, ReqError> {
        let state = self.service.current_state().await;
        debug!(?state, "State read");
        Ok(state.encode().to_vec())
    }

    /// Handle networking enabled read
    pub async fn handle_networking_enabled_read(&self) -> Result<Vec<u8>, ReqError> {
        let state = self.service.current_state().await;
        Ok(vec![u8::from(state.networking_enabled)])
    }

    /// Handle wireless enabled read
    pub async fn handle_wireless_enabled_read(&self) -> Result<Vec<u8>, ReqError> {
        let state = self.service.current_state().await;
        Ok(vec![u8::from(state.wireless_enabled)])
    }

    /// Push every command response to a subscribed client
    pub async fn notify_responses(&self, notifier: CharacteristicNotifier) {
        let updates = self.service.responses().subscribe();
        forward("response", notifier, updates, |response| {
            Some(response.encode().to_vec())
        })
        .await;
    }

    /// Push every state change to a subscribed client
    pub async fn notify_state(&self, notifier: CharacteristicNotifier) {
        let updates = self.service.state().subscribe();
        forward("state", notifier, updates, |state| Some(state.encode().to_vec())).await;
    }

    /// Push networking enabled changes to a subscribed client
    pub async fn notify_networking_enabled(&self, notifier: CharacteristicNotifier) {
        let updates = self.service.state().subscribe();
        let mut tracker = FlagTracker::new(self.service.state().latest(), |state| {
            state.networking_enabled
        });
        forward("networking enabled", notifier, updates, move |state| {
            tracker.update(state)
        })
        .await;
    }

    /// Push wireless enabled changes to a subscribed client
    pub async fn notify_wireless_enabled(&self, notifier: CharacteristicNotifier) {
        let updates = self.service.state().subscribe();
        let mut tracker = FlagTracker::new(self.service.state().latest(), |state| {
            state.wireless_enabled
        });
        forward("wireless enabled", notifier, updates, move |state| {
            tracker.update(state)
        })
        .await;
    }
}

/// Forward channel updates to a notification session until it ends
async fn forward<T: Clone>(
    name: &'static str,
    mut notifier: CharacteristicNotifier,
    mut updates: broadcast::Receiver<T>,
    mut encode: impl FnMut(&T) -> Option<Vec<u8>>,
) {
    debug!("{} notification session started", name);

    loop {
        let update = match updates.recv().await {
            Ok(update) => update,
            Err(RecvError::Lagged(skipped)) => {
                warn!("{} notifications lagged, skipped {}", name, skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if notifier.is_stopped() {
            break;
        }

        let Some(value) = encode(&update) else {
            continue;
        };

        if let Err(e) = notifier.notify(value).await {
            debug!("{} notification failed: {}", name, e);
            break;
        }
    }

    debug!("{} notification session ended", name);
}

/// Encodes a single state flag, skipping states where it did not change
struct FlagTracker {
    last: Option<bool>,
    select: fn(&NetworkState) -> bool,
}

impl FlagTracker {
    fn new(initial: Option<NetworkState>, select: fn(&NetworkState) -> bool) -> Self {
        Self {
            last: initial.as_ref().map(select),
            select,
        }
    }

    fn update(&mut self, state: &NetworkState) -> Option<Vec<u8>> {
        let flag = (self.select)(state);
        if self.last == Some(flag) {
            return None;
        }
        self.last = Some(flag);
        Some(vec![u8::from(flag)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{BackendCall, MockNetworkBackend},
        core::types::ManagerState,
        protocol::Response,
    };

    fn create_test_handler() -> (
        CharacteristicHandler<MockNetworkBackend>,
        Arc<MockNetworkBackend>,
    ) {
        let backend = Arc::new(MockNetworkBackend::new());
        let service = Arc::new(NetworkService::new(backend.clone()));

        (CharacteristicHandler::new(service), backend)
    }

    #[tokio::test]
    async fn test_response_read_before_any_command() {
        let (handler, _) = create_test_handler();

        let result = handler.handle_response_read().await;
        assert_eq!(result.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn test_command_write_valid() {
        let (handler, backend) = create_test_handler();

        let result = handler.handle_command_write(vec![0x02]).await;
        assert!(result.is_ok());

        assert_eq!(backend.calls().await, vec![BackendCall::EnableWireless]);
        assert_eq!(handler.handle_response_read().await.unwrap(), vec![0x00]);
    }

    #[tokio::test]
    async fn test_command_write_never_rejected() {
        let (handler, backend) = create_test_handler();

        // Too short, too long, unknown code
        tokio_test::assert_ok!(handler.handle_command_write(vec![]).await);
        tokio_test::assert_ok!(handler.handle_command_write(vec![0x00, 0x01]).await);
        tokio_test::assert_ok!(handler.handle_command_write(vec![0x42]).await);

        assert!(backend.calls().await.is_empty());
        assert_eq!(
            handler.handle_response_read().await.unwrap(),
            vec![u8::from(Response::InvalidValue)]
        );
    }

    #[tokio::test]
    async fn test_command_write_wireless_unavailable() {
        let (handler, backend) = create_test_handler();
        backend.set_wireless_available(false).await;

        handler.handle_command_write(vec![0x03]).await.unwrap();

        assert_eq!(handler.handle_response_read().await.unwrap(), vec![0x03]);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_state_read() {
        let (handler, backend) = create_test_handler();
        backend.set_manager_state(ManagerState::ConnectedSite).await;
        backend.set_networking_enabled(true).await;

        let state_bytes = handler.handle_state_read().await.unwrap();
        assert_eq!(state_bytes, vec![0x06, 0x01, 0x00]);
    }

    #[tokio::test]
    async fn test_flag_reads() {
        let (handler, backend) = create_test_handler();
        backend.set_wireless_enabled(true).await;

        assert_eq!(
            handler.handle_networking_enabled_read().await.unwrap(),
            vec![0x00]
        );
        assert_eq!(
            handler.handle_wireless_enabled_read().await.unwrap(),
            vec![0x01]
        );
    }

    #[test]
    fn test_flag_tracker_skips_unchanged() {
        let mut state = NetworkState {
            manager_state: ManagerState::Disconnected,
            networking_enabled: false,
            wireless_enabled: false,
        };
        let mut tracker = FlagTracker::new(Some(state), |state| state.wireless_enabled);

        // Manager state changes do not concern this flag
        state.manager_state = ManagerState::Connecting;
        assert_eq!(tracker.update(&state), None);

        state.wireless_enabled = true;
        assert_eq!(tracker.update(&state), Some(vec![0x01]));
        assert_eq!(tracker.update(&state), None);

        state.wireless_enabled = false;
        assert_eq!(tracker.update(&state), Some(vec![0x00]));
    }

    #[test]
    fn test_flag_tracker_without_initial_state() {
        let state = NetworkState {
            manager_state: ManagerState::Unknown,
            networking_enabled: true,
            wireless_enabled: false,
        };
        let mut tracker = FlagTracker::new(None, |state| state.networking_enabled);

        assert_eq!(tracker.update(&state), Some(vec![0x01]));
    }
}

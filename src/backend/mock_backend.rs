//! Mock network backend for testing

use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};

use crate::backend::{BackendEvent, NetworkBackend};
use crate::core::error::{BackendError, BackendResult};
use crate::core::types::ManagerState;

/// Backend request recorded by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCall {
    EnableNetworking,
    DisableNetworking,
    EnableWireless,
    DisableWireless,
}

/// Internal state for the mock backend
#[derive(Debug, Clone)]
struct MockState {
    available: bool,
    wireless_available: bool,
    networking_enabled: bool,
    wireless_enabled: bool,
    manager_state: ManagerState,
    should_fail_dispatch: bool,
    calls: Vec<BackendCall>,
    state_reads: usize,
}

/// Mock network backend for testing
///
/// Requests are only recorded. Tests simulate their completion with the
/// `set_*` methods, which update the state and emit the matching event.
#[derive(Debug, Clone)]
pub struct MockNetworkBackend {
    inner: Arc<Mutex<MockState>>,
    events: broadcast::Sender<BackendEvent>,
}

impl MockNetworkBackend {
    /// Create a new mock backend: manager and wireless available, everything disabled
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Mutex::new(MockState {
                available: true,
                wireless_available: true,
                networking_enabled: false,
                wireless_enabled: false,
                manager_state: ManagerState::Disconnected,
                should_fail_dispatch: false,
                calls: Vec::new(),
                state_reads: 0,
            })),
            events,
        }
    }

    /// Backend requests received so far, in call order
    pub async fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Number of manager state reads, one per full state snapshot
    pub async fn state_reads(&self) -> usize {
        self.inner.lock().await.state_reads
    }

    /// Configure mock to fail every dispatched request
    pub async fn set_dispatch_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_dispatch = should_fail;
    }

    pub async fn set_available(&self, available: bool) {
        self.inner.lock().await.available = available;
        self.emit(BackendEvent::AvailabilityChanged);
    }

    pub async fn set_wireless_available(&self, available: bool) {
        self.inner.lock().await.wireless_available = available;
        self.emit(BackendEvent::AvailabilityChanged);
    }

    pub async fn set_networking_enabled(&self, enabled: bool) {
        self.inner.lock().await.networking_enabled = enabled;
        self.emit(BackendEvent::NetworkingEnabledChanged);
    }

    pub async fn set_wireless_enabled(&self, enabled: bool) {
        self.inner.lock().await.wireless_enabled = enabled;
        self.emit(BackendEvent::WirelessEnabledChanged);
    }

    pub async fn set_manager_state(&self, state: ManagerState) {
        self.inner.lock().await.manager_state = state;
        self.emit(BackendEvent::ManagerStateChanged);
    }

    /// Emit an event without changing any state
    pub fn emit(&self, event: BackendEvent) {
        let _ = self.events.send(event);
    }

    async fn record(&self, call: BackendCall) -> BackendResult<()> {
        let mut state = self.inner.lock().await;
        state.calls.push(call);
        if state.should_fail_dispatch {
            Err(BackendError::Dispatch("Mock dispatch failure".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockNetworkBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBackend for MockNetworkBackend {
    async fn is_available(&self) -> bool {
        self.inner.lock().await.available
    }

    async fn is_wireless_available(&self) -> bool {
        self.inner.lock().await.wireless_available
    }

    async fn is_networking_enabled(&self) -> bool {
        self.inner.lock().await.networking_enabled
    }

    async fn is_wireless_enabled(&self) -> bool {
        self.inner.lock().await.wireless_enabled
    }

    async fn manager_state(&self) -> ManagerState {
        let mut state = self.inner.lock().await;
        state.state_reads += 1;
        state.manager_state
    }

    async fn enable_networking(&self) -> BackendResult<()> {
        self.record(BackendCall::EnableNetworking).await
    }

    async fn disable_networking(&self) -> BackendResult<()> {
        self.record(BackendCall::DisableNetworking).await
    }

    async fn enable_wireless(&self) -> BackendResult<()> {
        self.record(BackendCall::EnableWireless).await
    }

    async fn disable_wireless(&self) -> BackendResult<()> {
        self.record(BackendCall::DisableWireless).await
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_records_calls() {
        let backend = MockNetworkBackend::new();

        backend.enable_wireless().await.unwrap();
        backend.disable_networking().await.unwrap();

        assert_eq!(
            backend.calls().await,
            vec![BackendCall::EnableWireless, BackendCall::DisableNetworking]
        );
        // Requests do not change state by themselves
        assert!(!backend.is_wireless_enabled().await);
        assert!(!backend.is_networking_enabled().await);
    }

    #[tokio::test]
    async fn test_mock_backend_dispatch_failure() {
        let backend = MockNetworkBackend::new();
        backend.set_dispatch_failure(true).await;

        let result = backend.enable_networking().await;
        assert!(matches!(result, Err(BackendError::Dispatch(_))));
        assert_eq!(backend.calls().await, vec![BackendCall::EnableNetworking]);
    }

    #[tokio::test]
    async fn test_mock_backend_emits_events() {
        let backend = MockNetworkBackend::new();
        let mut events = backend.subscribe();

        backend.set_networking_enabled(true).await;
        backend.set_manager_state(ManagerState::ConnectedGlobal).await;

        assert_eq!(
            events.recv().await.unwrap(),
            BackendEvent::NetworkingEnabledChanged
        );
        assert_eq!(
            events.recv().await.unwrap(),
            BackendEvent::ManagerStateChanged
        );
        assert!(backend.is_networking_enabled().await);
        assert_eq!(backend.manager_state().await, ManagerState::ConnectedGlobal);
    }
}

//! Backend state change notifications

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{
    backend::{BackendEvent, NetworkBackend},
    core::{channel::Published, types::NetworkState},
};

/// Republishes the network state whenever the backend signals a change
///
/// Event payloads are never trusted: each event triggers a fresh read, and
/// a read equal to the last published state is dropped.
pub struct StateNotifier<B: NetworkBackend> {
    backend: Arc<B>,
    state: Arc<Published<NetworkState>>,
    events: broadcast::Receiver<BackendEvent>,
}

impl<B: NetworkBackend> StateNotifier<B> {
    /// Subscribe to the backend and seed the current state
    pub async fn new(backend: Arc<B>, state: Arc<Published<NetworkState>>) -> Self {
        let events = backend.subscribe();
        state.seed(NetworkState::read(&*backend).await);

        Self {
            backend,
            state,
            events,
        }
    }

    /// Re-read the state and publish it if it changed
    pub async fn refresh(&self) -> bool {
        let current = NetworkState::read(&*self.backend).await;
        let changed = self.state.publish_if_changed(current);
        if changed {
            info!(
                manager_state = ?current.manager_state,
                networking_enabled = current.networking_enabled,
                wireless_enabled = current.wireless_enabled,
                "Network state changed"
            );
        }
        changed
    }

    /// Process backend events until the backend goes away
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    debug!(?event, "Backend event received");
                    self.refresh().await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("State notifier lagged behind by {} events", skipped);
                    // Events still queued predate the re-read below
                    self.events = self.events.resubscribe();
                    self.refresh().await;
                }
                Err(RecvError::Closed) => {
                    info!("Backend event stream closed");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::MockNetworkBackend, core::types::ManagerState};
    use tokio::{
        sync::broadcast::error::TryRecvError,
        time::{Duration, sleep, timeout},
    };

    async fn spawn_notifier(
        backend: Arc<MockNetworkBackend>,
    ) -> (Arc<Published<NetworkState>>, broadcast::Receiver<NetworkState>) {
        let state = Arc::new(Published::new());
        let notifier = StateNotifier::new(backend, state.clone()).await;
        let updates = state.subscribe();
        tokio::spawn(notifier.run());
        (state, updates)
    }

    #[tokio::test]
    async fn test_seeds_current_state() {
        let backend = Arc::new(MockNetworkBackend::new());
        backend.set_wireless_enabled(true).await;

        let (state, _updates) = spawn_notifier(backend).await;

        let seeded = state.latest().unwrap();
        assert_eq!(seeded.manager_state, ManagerState::Disconnected);
        assert!(!seeded.networking_enabled);
        assert!(seeded.wireless_enabled);
    }

    #[tokio::test]
    async fn test_event_publishes_fresh_state() {
        let backend = Arc::new(MockNetworkBackend::new());
        let (_state, mut updates) = spawn_notifier(backend.clone()).await;

        backend.set_manager_state(ManagerState::ConnectedGlobal).await;

        let update = timeout(Duration::from_secs(1), updates.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.manager_state, ManagerState::ConnectedGlobal);
        assert_eq!(update.encode(), [0x07, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_duplicate_events_collapse() {
        let backend = Arc::new(MockNetworkBackend::new());
        let (_state, mut updates) = spawn_notifier(backend.clone()).await;

        backend.set_networking_enabled(true).await;
        backend.emit(BackendEvent::NetworkingEnabledChanged);
        backend.emit(BackendEvent::NetworkingEnabledChanged);

        let update = timeout(Duration::from_secs(1), updates.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(update.networking_enabled);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(updates.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_event_without_change_is_silent() {
        let backend = Arc::new(MockNetworkBackend::new());
        let (_state, mut updates) = spawn_notifier(backend.clone()).await;

        backend.emit(BackendEvent::WirelessEnabledChanged);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(updates.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_lagged_events_trigger_single_reread() {
        let backend = Arc::new(MockNetworkBackend::new());
        let state = Arc::new(Published::new());
        let notifier = StateNotifier::new(backend.clone(), state.clone()).await;
        let mut updates = state.subscribe();
        assert_eq!(backend.state_reads().await, 1);

        // Overflow the event channel before the notifier gets to run
        backend.set_manager_state(ManagerState::ConnectedGlobal).await;
        for _ in 0..100 {
            backend.emit(BackendEvent::ManagerStateChanged);
        }

        tokio::spawn(notifier.run());

        let update = timeout(Duration::from_secs(1), updates.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.manager_state, ManagerState::ConnectedGlobal);

        sleep(Duration::from_millis(50)).await;
        // Seed plus exactly one re-read
        assert_eq!(backend.state_reads().await, 2);
        assert_eq!(updates.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_refresh_reports_change() {
        let backend = Arc::new(MockNetworkBackend::new());
        let state = Arc::new(Published::new());
        let notifier = StateNotifier::new(backend.clone(), state.clone()).await;

        assert!(!notifier.refresh().await);
        backend.set_wireless_enabled(true).await;
        assert!(notifier.refresh().await);
        assert!(state.latest().unwrap().wireless_enabled);
    }
}

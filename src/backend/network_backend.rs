//! Network backend trait definition

use tokio::sync::broadcast;
use trait_variant::make;

use crate::core::{error::BackendResult, types::ManagerState};

/// State change signalled by the backend
///
/// Events only say *what* changed; consumers re-read the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    AvailabilityChanged,
    ManagerStateChanged,
    NetworkingEnabledChanged,
    WirelessEnabledChanged,
}

/// Abstraction over the network management daemon (typically NetworkManager)
///
/// Reads never fail: a backend that cannot answer reports itself as
/// unavailable, disabled or in `ManagerState::Unknown`.
///
/// The enable/disable requests are fire-and-forget. They return once the
/// request has been handed to the daemon; the resulting change arrives later
/// as a [`BackendEvent`]. Implementations must tolerate overlapping calls.
#[make(Send)]
pub trait NetworkBackend: Send + Sync + 'static {
    /// Whether the network manager is reachable
    async fn is_available(&self) -> bool;

    /// Whether wireless hardware is present
    async fn is_wireless_available(&self) -> bool;

    async fn is_networking_enabled(&self) -> bool;

    async fn is_wireless_enabled(&self) -> bool;

    async fn manager_state(&self) -> ManagerState;

    async fn enable_networking(&self) -> BackendResult<()>;

    async fn disable_networking(&self) -> BackendResult<()>;

    async fn enable_wireless(&self) -> BackendResult<()>;

    async fn disable_wireless(&self) -> BackendResult<()>;

    /// Subscribe to state change events
    fn subscribe(&self) -> broadcast::Receiver<BackendEvent>;
}

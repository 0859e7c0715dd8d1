//! Network backend abstraction layer

#[cfg(test)]
pub mod mock_backend;
pub mod network_backend;
pub mod nm_backend;

pub use network_backend::{BackendEvent, NetworkBackend};
pub use nm_backend::NetworkManagerBackend;

#[cfg(test)]
pub use mock_backend::{BackendCall, MockNetworkBackend};

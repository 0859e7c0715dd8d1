//! BLE Network Service
//!
//! Lets a BLE central query and change the network state of a headless host
//! through a small GATT service:
//! - a command characteristic accepting single-byte commands
//! - a response characteristic reporting whether each command was accepted
//! - state characteristics notifying actual NetworkManager state changes
//!
//! The same commands are available locally over a Unix socket (JSON-RPC 2.0).

pub mod backend;
pub mod config;
pub mod core;
pub mod protocol;
pub mod transport;

pub use self::core::{
    error::{BackendError, TransportError},
    types::{Capabilities, ManagerState, NetworkState},
};
pub use protocol::{Command, Response};

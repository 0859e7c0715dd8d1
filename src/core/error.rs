//! Error types for the BLE network service

use thiserror::Error;

/// Result type for network backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors related to network backend operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("D-Bus error: {0}")]
    DBus(String),

    #[error("Failed to dispatch request: {0}")]
    Dispatch(String),
}

impl From<zbus::Error> for BackendError {
    fn from(err: zbus::Error) -> Self {
        BackendError::DBus(err.to_string())
    }
}

impl From<zbus::fdo::Error> for BackendError {
    fn from(err: zbus::fdo::Error) -> Self {
        BackendError::DBus(err.to_string())
    }
}

/// Errors related to transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("BLE error: {0}")]
    Ble(#[from] bluer::Error),
}

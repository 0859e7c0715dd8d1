//! Notification message types (server-to-client events)

use serde::{Deserialize, Serialize};

use crate::core::types::NetworkState;

/// Server-to-client notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Network state changed
    StateChanged(NetworkState),
}

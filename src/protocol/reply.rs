//! Reply message types

use serde::{Deserialize, Serialize};

use crate::{core::types::NetworkState, protocol::Response};

/// Reply messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reply {
    /// Command reply
    Command(CommandReply),

    /// Network state reply
    State(NetworkState),
}

/// Reply for command request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandReply {
    pub response: Response,
    /// Byte the BLE response characteristic would carry
    pub code: u8,
}

impl From<Response> for CommandReply {
    fn from(response: Response) -> Self {
        Self {
            response,
            code: u8::from(response),
        }
    }
}

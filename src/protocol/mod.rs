//! Protocol message definitions
//!
//! `command` and `response` define the single-byte GATT values; the
//! remaining modules define the JSON-RPC messages of the local socket.

pub mod command;
pub mod jsonrpc;
pub mod notification;
pub mod reply;
pub mod request;
pub mod response;

pub use {
    command::Command,
    jsonrpc::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId},
    notification::Notification,
    reply::{CommandReply, Reply},
    request::{CommandParams, Request},
    response::Response,
};

//! Unix socket session management

use serde::Serialize;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::unix::{OwnedReadHalf, OwnedWriteHalf},
    sync::Mutex,
};

use crate::{
    core::{error::TransportResult, types::SessionId},
    protocol::{JsonRpcNotification, JsonRpcResponse},
};

/// Unix socket client session
///
/// Cloned handles share the writer, so responses and notifications never
/// interleave within a line.
#[derive(Debug, Clone)]
pub struct UnixSocketSession {
    id: SessionId,
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl UnixSocketSession {
    /// Create a new Unix socket session
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            id: SessionId::new(),
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Get session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Send a JSON-RPC response
    pub async fn send_response(&self, response: &JsonRpcResponse) -> TransportResult<()> {
        self.send_line(response).await
    }

    /// Send a JSON-RPC notification
    pub async fn send_notification(
        &self,
        notification: &JsonRpcNotification,
    ) -> TransportResult<()> {
        self.send_line(notification).await
    }

    async fn send_line<T: Serialize>(&self, message: &T) -> TransportResult<()> {
        let json = serde_json::to_string(message)?;

        let mut writer = self.writer.lock().await;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        Ok(())
    }
}

/// Session reader for processing incoming messages
pub struct SessionReader {
    reader: BufReader<OwnedReadHalf>,
}

impl SessionReader {
    /// Create a new session reader
    pub fn new(reader: OwnedReadHalf) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the next line from the socket
    pub async fn read_line(&mut self) -> TransportResult<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // EOF - connection closed
            return Ok(None);
        }

        // Remove trailing newline
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }
}

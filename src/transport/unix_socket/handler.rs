//! JSON-RPC request handler for Unix socket transport

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    backend::NetworkBackend,
    core::service::NetworkService,
    protocol::{
        CommandReply, JsonRpcError, JsonRpcRequest, JsonRpcResponse, Reply, Request, RequestId,
    },
};

/// JSON-RPC request handler
pub struct RequestHandler<B: NetworkBackend> {
    service: Arc<NetworkService<B>>,
}

impl<B: NetworkBackend> RequestHandler<B> {
    /// Create a new request handler
    pub fn new(service: Arc<NetworkService<B>>) -> Self {
        Self { service }
    }

    /// Handle one line of input
    pub async fn handle_line(&self, line: &str) -> JsonRpcResponse {
        let raw: serde_json::Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Unparsable request: {}", e);
                return JsonRpcResponse::error(JsonRpcError::parse_error(), RequestId::Null);
            }
        };

        let id = RequestId::from_raw(&raw);
        let unknown_method = raw
            .get("method")
            .and_then(|method| method.as_str())
            .filter(|method| !Request::is_known_method(method));
        if let Some(method) = unknown_method {
            warn!("Unknown JSON-RPC method: {}", method);
            return JsonRpcResponse::error(JsonRpcError::method_not_found(method), id);
        }

        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid JSON-RPC request: {}", e);
                JsonRpcResponse::error(JsonRpcError::invalid_request(e.to_string()), id)
            }
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(request = ?request.request, "JSON-RPC request");

        let reply = match request.request {
            Request::Command(params) => {
                let response = self.service.execute_command(&[params.value]).await;
                Reply::Command(CommandReply::from(response))
            }
            Request::GetState => Reply::State(self.service.current_state().await),
        };

        JsonRpcResponse::success(reply, request.id)
    }
}

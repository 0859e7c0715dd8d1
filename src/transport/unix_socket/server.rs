//! Unix socket server implementation

use listenfd::ListenFd;
use std::{fs::Permissions, os::unix::fs::PermissionsExt, path::Path, sync::Arc};
use tokio::{
    fs,
    net::{UnixListener, UnixStream},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, error, info, warn};

use crate::{
    backend::NetworkBackend,
    core::{
        error::{TransportError, TransportResult},
        service::NetworkService,
        types::NetworkState,
    },
    protocol::{JsonRpcNotification, Notification},
    transport::unix_socket::{
        handler::RequestHandler,
        session::{SessionReader, UnixSocketSession},
    },
};

/// Unix socket server
pub struct UnixSocketServer<B: NetworkBackend> {
    socket_path: String,
    socket_mode: u32,
    service: Arc<NetworkService<B>>,
    handler: Arc<RequestHandler<B>>,
}

impl<B: NetworkBackend> UnixSocketServer<B> {
    /// Create a new Unix socket server
    pub fn new(socket_path: String, socket_mode: u32, service: Arc<NetworkService<B>>) -> Self {
        let handler = Arc::new(RequestHandler::new(service.clone()));

        Self {
            socket_path,
            socket_mode,
            service,
            handler,
        }
    }

    /// Start the server
    pub async fn start(&self) -> TransportResult<()> {
        let listener = self.listen().await?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handler = self.handler.clone();
                    let updates = self.service.state().subscribe();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, handler, updates).await {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Take a socket passed by systemd, or bind our own
    async fn listen(&self) -> TransportResult<UnixListener> {
        let mut listenfd = ListenFd::from_env();
        if let Some(listener) = listenfd.take_unix_listener(0)? {
            listener.set_nonblocking(true)?;
            info!("Unix socket server using socket passed by service manager");
            return Ok(UnixListener::from_std(listener)?);
        }

        // Remove existing socket file if it exists
        if Path::new(&self.socket_path).exists() {
            fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        fs::set_permissions(&self.socket_path, Permissions::from_mode(self.socket_mode)).await?;
        info!(
            "Unix socket server listening on {} (mode {:o})",
            self.socket_path, self.socket_mode
        );

        Ok(listener)
    }

    async fn handle_client(
        stream: UnixStream,
        handler: Arc<RequestHandler<B>>,
        updates: broadcast::Receiver<NetworkState>,
    ) -> TransportResult<()> {
        let (read_half, write_half) = stream.into_split();
        let session = UnixSocketSession::new(write_half);
        let mut reader = SessionReader::new(read_half);

        info!("New client connected: {}", session.id());

        let notifications = tokio::spawn(Self::forward_state_changes(session.clone(), updates));

        let result = async {
            while let Some(line) = reader.read_line().await? {
                if line.is_empty() {
                    continue;
                }

                let response = handler.handle_line(&line).await;
                session.send_response(&response).await?;
            }
            Ok::<(), TransportError>(())
        }
        .await;

        notifications.abort();
        info!("Client disconnected: {}", session.id());
        result
    }

    async fn forward_state_changes(
        session: UnixSocketSession,
        mut updates: broadcast::Receiver<NetworkState>,
    ) {
        loop {
            let state = match updates.recv().await {
                Ok(state) => state,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Session {} lagged, skipped {} updates", session.id(), skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let notification = JsonRpcNotification::new(Notification::StateChanged(state));
            if let Err(e) = session.send_notification(&notification).await {
                debug!("Stopping notifications for {}: {}", session.id(), e);
                break;
            }
        }
    }
}

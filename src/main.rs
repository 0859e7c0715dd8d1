//! BLE Network Service - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ble_network_service::{
    backend::NetworkManagerBackend,
    config::{CliArgs, Settings},
    core::service::NetworkService,
    transport::{
        ble::{BleAdapter, GattServer},
        unix_socket::UnixSocketServer,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ble_network_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let settings = Settings::from(CliArgs::parse());
    info!(?settings, "Starting BLE network service");

    if !settings.has_transport() {
        error!("At least one transport (BLE or Unix socket) must be enabled");
        return Err("No transport enabled".into());
    }

    // Create NetworkManager backend
    let backend = Arc::new(NetworkManagerBackend::new().await?);
    info!("NetworkManager backend initialized");

    let service = Arc::new(NetworkService::new(backend));
    let notifier = service.spawn_state_notifier().await;
    info!("Network service created");

    let mut tasks = vec![notifier];

    // Start Unix socket transport
    if settings.enable_unix_socket {
        info!("Starting Unix socket transport on {}", settings.socket_path);

        let server = UnixSocketServer::new(
            settings.socket_path.clone(),
            settings.socket_mode,
            service.clone(),
        );

        tasks.push(tokio::spawn(async move {
            if let Err(e) = server.start().await {
                error!("Unix socket server error: {}", e);
            }
        }));
    }

    // Start BLE transport
    let mut adapter = None;
    if settings.enable_ble {
        info!("Starting BLE transport");

        match start_ble_transport(service.clone(), &settings).await {
            Ok(started) => adapter = Some(started),
            Err(e) => {
                error!("Failed to start BLE transport: {}", e);
                if !settings.enable_unix_socket {
                    return Err(e);
                }
            }
        }
    }

    info!("Service started successfully");

    #[cfg(feature = "systemd")]
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        error!("Failed to notify systemd: {}", e);
    }

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        _ = shutdown_signal() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        result = run_ble_events(adapter.as_ref()) => {
            if let Err(e) = result {
                error!("BLE adapter error: {}", e);
            }
        }
        _ = async {
            for task in tasks {
                let _ = task.await;
            }
        } => {
            info!("All tasks completed");
        }
    }

    info!("Shutting down...");
    if let Some(adapter) = adapter.as_mut() {
        adapter.stop();
    }
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    // On non-Unix platforms, just wait forever
    std::future::pending::<()>().await
}

async fn start_ble_transport(
    service: Arc<NetworkService<NetworkManagerBackend>>,
    settings: &Settings,
) -> Result<BleAdapter, Box<dyn std::error::Error>> {
    let mut adapter = BleAdapter::new(settings.device_name.clone()).await?;

    let gatt_server = Arc::new(GattServer::new(service));
    adapter.start(gatt_server).await?;

    Ok(adapter)
}

async fn run_ble_events(adapter: Option<&BleAdapter>) -> Result<(), bluer::Error> {
    match adapter {
        Some(adapter) => adapter.run_event_loop().await,
        None => std::future::pending().await,
    }
}

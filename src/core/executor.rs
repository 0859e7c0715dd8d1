//! Command validation and dispatch

use tracing::{debug, error, warn};

use crate::{
    backend::NetworkBackend,
    core::types::Capabilities,
    protocol::{Command, Response},
};

/// Validate a command against the backend capabilities and dispatch it
///
/// Precondition failures are reported without touching the backend.
/// `Success` means the request was handed to the backend, not that the
/// state has changed. `UnknownError` is reserved for a failed dispatch.
pub async fn execute<B: NetworkBackend>(
    command: Command,
    capabilities: Capabilities,
    backend: &B,
) -> Response {
    let needs_wireless = matches!(
        command,
        Command::EnableWireless | Command::DisableWireless
    );

    if command == Command::Invalid {
        warn!("Rejecting invalid command value");
        return Response::InvalidValue;
    }

    if !capabilities.manager_available {
        warn!(?command, "Network manager not available");
        return Response::NetworkManagerNotAvailable;
    }

    if needs_wireless && !capabilities.wireless_available {
        warn!(?command, "Wireless hardware not available");
        return Response::WirelessNotAvailable;
    }

    let result = match command {
        Command::EnableNetworking => backend.enable_networking().await,
        Command::DisableNetworking => backend.disable_networking().await,
        Command::EnableWireless => backend.enable_wireless().await,
        Command::DisableWireless => backend.disable_wireless().await,
        Command::Invalid => return Response::InvalidValue,
    };

    match result {
        Ok(()) => {
            debug!(?command, "Command dispatched");
            Response::Success
        }
        Err(e) => {
            error!(?command, "Failed to dispatch command: {}", e);
            Response::UnknownError
        }
    }
}

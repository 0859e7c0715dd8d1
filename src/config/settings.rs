//! Runtime settings

use crate::config::CliArgs;

const DEFAULT_SOCKET_MODE: u32 = 0o660;

/// Runtime configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub device_name: String,
    pub enable_ble: bool,
    pub enable_unix_socket: bool,
    pub socket_path: String,
    pub socket_mode: u32,
}

impl Settings {
    /// Whether at least one transport is enabled
    pub fn has_transport(&self) -> bool {
        self.enable_ble || self.enable_unix_socket
    }
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        // Parse octal socket mode
        let socket_mode =
            u32::from_str_radix(&args.socket_mode, 8).unwrap_or(DEFAULT_SOCKET_MODE);

        Settings {
            device_name: args.device_name,
            enable_ble: args.enable_ble,
            enable_unix_socket: args.enable_unix_socket,
            socket_path: args.socket_path,
            socket_mode,
        }
    }
}

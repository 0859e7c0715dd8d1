//! Command-line argument parsing

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "ble-network-service", version, author)]
#[clap(about = "Network control service over BLE GATT and Unix socket")]
pub struct CliArgs {
    /// Name the BLE adapter advertises
    #[clap(short, long, default_value = "Network-Setup")]
    pub device_name: String,

    /// Enable BLE transport
    #[clap(long, default_value = "true", action = clap::ArgAction::Set)]
    pub enable_ble: bool,

    /// Enable Unix socket transport
    #[clap(long)]
    pub enable_unix_socket: bool,

    /// Path for Unix socket
    #[clap(long, default_value = "/run/ble-network-service.sock")]
    pub socket_path: String,

    /// Socket file permissions (octal, e.g., 660)
    #[clap(long, default_value = "660")]
    pub socket_mode: String,
}

//! Transport layers driving the network service

pub mod ble;
pub mod unix_socket;

//! BLE GATT UUIDs of the network service

use uuid::Uuid;

/// Network service UUID
pub const NETWORK_SERVICE_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x10, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

/// Network state characteristic (read/notify, 3 bytes)
pub const STATE_CHAR_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x11, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

/// Command characteristic (write, 1 byte)
pub const COMMAND_CHAR_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x12, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

/// Command response characteristic (read/notify, 1 byte)
pub const RESPONSE_CHAR_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x13, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

/// Networking enabled characteristic (read/notify, 1 byte)
pub const NETWORKING_ENABLED_CHAR_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x14, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

/// Wireless enabled characteristic (read/notify, 1 byte)
pub const WIRELESS_ENABLED_CHAR_UUID: Uuid = Uuid::from_bytes([
    0xef, 0x6d, 0x66, 0x15, 0xb8, 0xaf, 0x49, 0xe0, 0x9e, 0xca, 0xab, 0x34, 0x35, 0x13, 0x64, 0x1c,
]);

//! Domain types for network control

use serde::{Deserialize, Serialize};

use crate::backend::NetworkBackend;

/// NetworkManager lifecycle state
///
/// The discriminant is the byte carried by the state characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ManagerState {
    Unknown = 0x00,
    Asleep = 0x01,
    Disconnected = 0x02,
    Disconnecting = 0x03,
    Connecting = 0x04,
    ConnectedLocal = 0x05,
    ConnectedSite = 0x06,
    ConnectedGlobal = 0x07,
}

impl ManagerState {
    /// Map the raw `NMState` value reported over D-Bus.
    pub fn from_nm_state(value: u32) -> Self {
        match value {
            10 => ManagerState::Asleep,
            20 => ManagerState::Disconnected,
            30 => ManagerState::Disconnecting,
            40 => ManagerState::Connecting,
            50 => ManagerState::ConnectedLocal,
            60 => ManagerState::ConnectedSite,
            70 => ManagerState::ConnectedGlobal,
            _ => ManagerState::Unknown,
        }
    }
}

impl TryFrom<u8> for ManagerState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0x00 => Ok(ManagerState::Unknown),
            0x01 => Ok(ManagerState::Asleep),
            0x02 => Ok(ManagerState::Disconnected),
            0x03 => Ok(ManagerState::Disconnecting),
            0x04 => Ok(ManagerState::Connecting),
            0x05 => Ok(ManagerState::ConnectedLocal),
            0x06 => Ok(ManagerState::ConnectedSite),
            0x07 => Ok(ManagerState::ConnectedGlobal),
            _ => Err(()),
        }
    }
}

impl From<ManagerState> for u8 {
    fn from(state: ManagerState) -> Self {
        state as u8
    }
}

/// Backend capabilities, read fresh before every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub manager_available: bool,
    pub wireless_available: bool,
}

impl Capabilities {
    /// Nothing available, used when no backend read is needed
    pub const NONE: Self = Self {
        manager_available: false,
        wireless_available: false,
    };

    pub async fn read<B: NetworkBackend>(backend: &B) -> Self {
        Self {
            manager_available: backend.is_available().await,
            wireless_available: backend.is_wireless_available().await,
        }
    }
}

/// Snapshot of the observable network state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    pub manager_state: ManagerState,
    pub networking_enabled: bool,
    pub wireless_enabled: bool,
}

impl NetworkState {
    /// Length of the encoded state characteristic value
    pub const ENCODED_LEN: usize = 3;

    pub async fn read<B: NetworkBackend>(backend: &B) -> Self {
        Self {
            manager_state: backend.manager_state().await,
            networking_enabled: backend.is_networking_enabled().await,
            wireless_enabled: backend.is_wireless_enabled().await,
        }
    }

    /// Encode as `[manager_state, networking_enabled, wireless_enabled]`
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        [
            u8::from(self.manager_state),
            u8::from(self.networking_enabled),
            u8::from(self.wireless_enabled),
        ]
    }
}

impl TryFrom<&[u8]> for NetworkState {
    type Error = ();

    fn try_from(value: &[u8]) -> Result<Self, <Self as TryFrom<&[u8]>>::Error> {
        let flag = |byte: u8| match byte {
            0x00 => Ok(false),
            0x01 => Ok(true),
            _ => Err(()),
        };

        match value {
            [state, networking, wireless] => Ok(Self {
                manager_state: ManagerState::try_from(*state)?,
                networking_enabled: flag(*networking)?,
                wireless_enabled: flag(*wireless)?,
            }),
            _ => Err(()),
        }
    }
}

/// Session identifier for transport connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Command characteristic value decoding

use serde::{Deserialize, Serialize};

/// Command written to the command characteristic
///
/// `Invalid` never appears on the wire; it marks a write that did not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    EnableNetworking,
    DisableNetworking,
    EnableWireless,
    DisableWireless,
    Invalid,
}

impl Command {
    /// Decode a raw characteristic value
    ///
    /// Only a single byte carrying a known command code is accepted.
    pub fn decode(value: &[u8]) -> Self {
        match value {
            [code] => Command::try_from(*code).unwrap_or(Command::Invalid),
            _ => Command::Invalid,
        }
    }

    /// Wire code, `None` for `Invalid`
    pub fn code(self) -> Option<u8> {
        match self {
            Command::EnableNetworking => Some(0x00),
            Command::DisableNetworking => Some(0x01),
            Command::EnableWireless => Some(0x02),
            Command::DisableWireless => Some(0x03),
            Command::Invalid => None,
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0x00 => Ok(Command::EnableNetworking),
            0x01 => Ok(Command::DisableNetworking),
            0x02 => Ok(Command::EnableWireless),
            0x03 => Ok(Command::DisableWireless),
            _ => Err(()),
        }
    }
}

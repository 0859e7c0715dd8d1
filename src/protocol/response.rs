//! Response characteristic value encoding

use serde::{Deserialize, Serialize};

/// Outcome reported for every processed command write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Response {
    /// Request accepted and dispatched; completion shows up on the state characteristic
    Success = 0x00,
    InvalidValue = 0x01,
    NetworkManagerNotAvailable = 0x02,
    WirelessNotAvailable = 0x03,
    UnknownError = 0x04,
}

impl Response {
    /// Encode as the response characteristic value
    pub fn encode(self) -> [u8; 1] {
        [u8::from(self)]
    }
}

impl TryFrom<u8> for Response {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0x00 => Ok(Response::Success),
            0x01 => Ok(Response::InvalidValue),
            0x02 => Ok(Response::NetworkManagerNotAvailable),
            0x03 => Ok(Response::WirelessNotAvailable),
            0x04 => Ok(Response::UnknownError),
            _ => Err(()),
        }
    }
}

impl From<Response> for u8 {
    fn from(response: Response) -> Self {
        response as u8
    }
}

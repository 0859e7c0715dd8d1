//! Request message types

use serde::{Deserialize, Serialize};

/// Request messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Submit a raw command byte, exactly as written to the command characteristic
    Command(CommandParams),

    /// Read the current network state
    GetState,
}

impl Request {
    /// Method names understood by the server
    pub const METHODS: [&'static str; 2] = ["command", "get_state"];

    pub fn is_known_method(method: &str) -> bool {
        Self::METHODS.contains(&method)
    }
}

/// Parameters for command request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandParams {
    pub value: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_command_serialization() {
        let request = Request::Command(CommandParams { value: 2 });
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"method":"command","params":{"value":2}}"#);

        let deserialized: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_request_get_state() {
        let request = Request::GetState;
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"method":"get_state"}"#);
    }

    #[test]
    fn test_known_methods() {
        assert!(Request::is_known_method("command"));
        assert!(Request::is_known_method("get_state"));
        assert!(!Request::is_known_method("reboot"));
        assert!(!Request::is_known_method("getState"));
    }

    #[test]
    fn test_request_command_value_out_of_byte_range() {
        let result = serde_json::from_str::<Request>(r#"{"method":"command","params":{"value":256}}"#);
        assert!(result.is_err());
    }
}

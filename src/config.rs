//! Configuration for the protocol engine and the UART adapter.
//!
//! Both structs deserialize from JSON with per-field defaults, so a config
//! file only needs to name what it changes:
//!
//! ```
//! use ohand_client::config::ProtocolConfig;
//!
//! let config = ProtocolConfig::from_json_str(r#"{ "command_timeout_ms": 500 }"#).unwrap();
//! assert_eq!(config.master_address, 0x01);
//! assert_eq!(config.command_timeout_ms, 500);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HandError, Result};

/// Default master node address.
pub const DEFAULT_MASTER_ADDRESS: u8 = 0x01;

/// Default per-command response timeout.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 255;

/// Default sleep between transport polls while waiting.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1;

/// Default UART baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default UART read timeout (one poll).
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5;

/// Protocol engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Address of this controller on the bus.
    pub master_address: u8,
    /// Response timeout applied to every command.
    pub command_timeout_ms: u64,
    /// Sleep between transport polls.
    pub poll_interval_ms: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            master_address: DEFAULT_MASTER_ADDRESS,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ProtocolConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| HandError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

/// UART adapter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port name, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Read timeout for one poll.
    pub read_timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    /// Settings for `port` with default baud rate and timeout.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

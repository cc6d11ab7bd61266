//! Error types for ohand-client.
//!
//! Errors fall into three categories:
//! - **Local**: the request never made it onto the wire.
//! - **Protocol**: a response arrived (or did not) but failed validation.
//! - **Remote**: the hand answered with its error flag set.

use std::fmt;

use thiserror::Error;

/// Main error type for all hand operations.
#[derive(Debug, Error)]
pub enum HandError {
    /// No clock was installed on the transactor.
    #[error("Timer not configured")]
    TimerNotConfigured,

    /// The client was built without a transport.
    #[error("Invalid context: no transport configured")]
    InvalidContext,

    /// The transport failed to send a frame.
    #[error("Transport failure: {0}")]
    TransportFailure(#[from] std::io::Error),

    /// Request payload does not fit into a single frame.
    #[error("Payload of {len} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Requested payload length.
        len: usize,
        /// Largest sendable payload.
        max: usize,
    },

    /// No response arrived before the deadline.
    #[error("Timed out waiting for response")]
    Timeout,

    /// Received LRC does not match the recomputed one.
    #[error("Bad checksum: expected {expected:#04x}, got {actual:#04x}")]
    BadChecksum {
        /// Checksum computed over the received bytes.
        expected: u8,
        /// Checksum byte on the wire.
        actual: u8,
    },

    /// Response came from a different node than the one addressed.
    #[error("Unmatched address: expected {expected:#04x}, got {actual:#04x}")]
    UnmatchedAddress {
        /// Node the request went to.
        expected: u8,
        /// Source of the response.
        actual: u8,
    },

    /// Response carries a different command than the one requested.
    #[error("Unmatched command: expected {expected:#04x}, got {actual:#04x}")]
    UnmatchedCommand {
        /// Command that was sent.
        expected: u8,
        /// Command carried by the response.
        actual: u8,
    },

    /// Response payload is larger than the caller allowed for.
    #[error("Response of {len} bytes exceeds capacity {capacity}")]
    BufferTooSmall {
        /// Response payload length.
        len: usize,
        /// Largest payload the caller accepts.
        capacity: usize,
    },

    /// Device reported more entries than the caller's buffers can hold.
    #[error("Data too large for output buffer")]
    DataTooLarge,

    /// Payload content or length is inconsistent with the expected layout.
    #[error("Invalid data: {0}")]
    DataInvalid(String),

    /// The hand reported an application-level fault.
    #[error("Remote error: {0}")]
    Remote(RemoteFault),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of a [`HandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Failure before or while writing to the transport.
    Local,
    /// Failure while waiting for or validating the response.
    Protocol,
    /// Fault reported by the device itself.
    Remote,
}

impl HandError {
    /// Build a `DataInvalid` error from anything displayable.
    pub(crate) fn invalid(msg: impl fmt::Display) -> Self {
        Self::DataInvalid(msg.to_string())
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TimerNotConfigured
            | Self::InvalidContext
            | Self::TransportFailure(_)
            | Self::PayloadTooLarge { .. }
            | Self::Config(_) => ErrorCategory::Local,
            Self::Timeout
            | Self::BadChecksum { .. }
            | Self::UnmatchedAddress { .. }
            | Self::UnmatchedCommand { .. }
            | Self::BufferTooSmall { .. }
            | Self::DataTooLarge
            | Self::DataInvalid(_) => ErrorCategory::Protocol,
            Self::Remote(_) => ErrorCategory::Remote,
        }
    }

    /// The remote fault, if this is a device-reported error.
    pub fn remote_fault(&self) -> Option<RemoteFault> {
        match self {
            Self::Remote(fault) => Some(*fault),
            _ => None,
        }
    }
}

/// Device-side error code, carried verbatim from the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteFault(pub u8);

impl RemoteFault {
    /// Hand received a frame with a wrong LRC.
    pub const WRONG_LRC: Self = Self(0x01);
    /// Command not recognised.
    pub const COMMAND_INVALID: Self = Self(0x11);
    /// Command payload has the wrong length.
    pub const INVALID_BYTE_COUNT: Self = Self(0x12);
    /// Command payload is out of range.
    pub const INVALID_DATA: Self = Self(0x13);
    /// Hand is still initializing.
    pub const STATUS_INIT: Self = Self(0x21);
    /// Hand needs calibration.
    pub const STATUS_CALI: Self = Self(0x22);
    /// A mechanism is stuck.
    pub const STATUS_STUCK: Self = Self(0x23);
    /// Operation failed.
    pub const OP_FAILED: Self = Self(0x31);
    /// Saving to flash failed.
    pub const SAVE_FAILED: Self = Self(0x32);

    /// Raw code as sent by the device.
    #[inline]
    pub fn code(&self) -> u8 {
        self.0
    }

    /// Human-readable name for known codes.
    pub fn description(&self) -> Option<&'static str> {
        Some(match *self {
            Self::WRONG_LRC => "wrong LRC",
            Self::COMMAND_INVALID => "invalid command",
            Self::INVALID_BYTE_COUNT => "invalid byte count",
            Self::INVALID_DATA => "invalid data",
            Self::STATUS_INIT => "initializing",
            Self::STATUS_CALI => "calibration required",
            Self::STATUS_STUCK => "stuck",
            Self::OP_FAILED => "operation failed",
            Self::SAVE_FAILED => "save failed",
            _ => return None,
        })
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(name) => write!(f, "{} ({:#04x})", name, self.0),
            None => write!(f, "unknown ({:#04x})", self.0),
        }
    }
}

impl From<serde_json::Error> for HandError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type alias using HandError.
pub type Result<T> = std::result::Result<T, HandError>;

//! # ohand-client
//!
//! Master-side protocol engine for OHand dexterous hands.
//!
//! A master controller drives one or more addressed hands over a shared
//! half-duplex byte link (UART, or CAN carrying the same byte stream in
//! 8-byte link frames). Every exchange is one request frame and one response
//! frame:
//!
//! ```text
//! [0x55][0xAA][dest][src][cmd][len][payload: 0..64][lrc]
//! ```
//!
//! ## Architecture
//!
//! - **Protocol**: frame encoding, LRC checksum and the incremental decoder
//! - **Transactor**: send, wait with timeout, validate checksum/address/command
//! - **Codec**: payload layouts for every command, including the batched custom command
//! - **Client**: [`OHand`], one typed method per command
//!
//! ## Example
//!
//! ```ignore
//! use ohand_client::config::SerialConfig;
//! use ohand_client::transport::SerialTransport;
//! use ohand_client::OHand;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let port = SerialTransport::open(&SerialConfig::new("/dev/ttyUSB0"))?;
//!     let mut hand = OHand::builder().transport(port).build()?;
//!
//!     let fw = hand.get_firmware_version(0x02)?;
//!     println!("firmware {}", fw);
//!
//!     hand.set_finger_pos(0x02, 1, 65535, 255)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transactor;
pub mod transport;
pub mod types;

mod client;
mod commands;

pub use client::{OHand, OHandBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::calibration::MAX_THUMB_ROOT_POS;
pub use codec::motors::MAX_MOTOR_CNT;
pub use codec::{CalibrationData, CustomRequest, CustomResponse, MotorValues, SubCommand};
pub use config::{ProtocolConfig, SerialConfig};
pub use error::{ErrorCategory, HandError, RemoteFault, Result};
pub use protocol::Command;
pub use transactor::Transactor;
pub use types::{
    FingerValue, FirmwareVersion, HardwareVersion, ManufactureData, Pid, PosLimit,
    ProtocolVersion, SelfTestLevel, StopParams, ThumbRootPos, Uid, UsageStat, MAX_FORCE_ENTRIES,
};

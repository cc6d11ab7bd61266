//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the byte-level protocol shared by UART and CAN:
//! - Frame encoding and LRC checksum
//! - Incremental decoder for fragmented byte streams
//! - Frame struct with typed accessors
//! - Command identifiers

mod command;
mod decoder;
mod frame;
mod wire_format;

pub use command::Command;
pub use decoder::{DecoderPhase, FrameDecoder};
pub use frame::Frame;
pub use wire_format::{
    encode_frame, frame_lrc, lrc, BROADCAST_ADDRESS, CAPTURE_SIZE, CMD_ERROR_MASK,
    FRAME_OVERHEAD, FRAME_PREFIX_SIZE, HEADER_0, HEADER_1, MAX_PROTOCOL_DATA_SIZE,
    MAX_SEND_PAYLOAD_SIZE,
};

//! Frame struct with typed accessors.
//!
//! Represents one decoded frame, header through checksum. The checksum is
//! the byte received on the wire; [`Frame::verify_checksum`] recomputes it.
//!
//! # Example
//!
//! ```
//! use ohand_client::protocol::Frame;
//! use bytes::Bytes;
//!
//! let frame = Frame::new(0x01, 0x02, 0x0B, Bytes::from_static(&[0x00, 0x10, 0x00]));
//! assert_eq!(frame.command_id(), 0x0B);
//! assert!(frame.verify_checksum());
//! ```

use bytes::Bytes;

use super::wire_format::{encode_frame, frame_lrc, CMD_ERROR_MASK, MAX_PROTOCOL_DATA_SIZE};
use crate::error::Result;

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Destination node address.
    pub dest: u8,
    /// Source node address.
    pub src: u8,
    /// Raw command byte, error flag included.
    pub command: u8,
    /// Payload bytes.
    pub payload: Bytes,
    /// Checksum as transmitted.
    pub checksum: u8,
}

impl Frame {
    /// Create a frame with a correct checksum.
    ///
    /// `payload` must not exceed [`MAX_PROTOCOL_DATA_SIZE`] bytes; the length
    /// byte of the checksum span cannot represent more.
    pub fn new(dest: u8, src: u8, command: u8, payload: Bytes) -> Self {
        debug_assert!(
            payload.len() <= MAX_PROTOCOL_DATA_SIZE,
            "frame payload of {} bytes exceeds {}",
            payload.len(),
            MAX_PROTOCOL_DATA_SIZE
        );
        let checksum = frame_lrc(dest, src, command, &payload);
        Self {
            dest,
            src,
            command,
            payload,
            checksum,
        }
    }

    /// Create a frame from captured parts, keeping the received checksum.
    pub fn from_wire(dest: u8, src: u8, command: u8, payload: &[u8], checksum: u8) -> Self {
        Self {
            dest,
            src,
            command,
            payload: Bytes::copy_from_slice(payload),
            checksum,
        }
    }

    /// Command with the error flag stripped.
    #[inline]
    pub fn command_id(&self) -> u8 {
        self.command & !CMD_ERROR_MASK
    }

    /// Check if the hand flagged this response as an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.command & CMD_ERROR_MASK != 0
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Recompute the checksum from the frame contents.
    #[inline]
    pub fn compute_checksum(&self) -> u8 {
        frame_lrc(self.dest, self.src, self.command, &self.payload)
    }

    /// Check the transmitted checksum against the recomputed one.
    #[inline]
    pub fn verify_checksum(&self) -> bool {
        self.compute_checksum() == self.checksum
    }

    /// Encode to wire bytes with a freshly computed checksum.
    pub fn encode(&self) -> Result<Bytes> {
        encode_frame(self.dest, self.src, self.command, &self.payload)
    }
}

//! Incremental frame decoder.
//!
//! Consumes the byte stream one byte at a time and captures at most one
//! completed frame. The state machine walks the frame layout:
//! - `AwaitHeader0` / `AwaitHeader1`: the `0x55 0xAA` preamble
//! - `AwaitDestAddr` .. `AwaitLength`: fixed one-byte fields
//! - `AwaitPayload`: carries the number of payload bytes still expected
//! - `AwaitChecksum`: the trailing LRC
//!
//! A frame is only marked ready when its destination is the local address.
//! While a ready frame is waiting to be taken, every further byte is dropped;
//! the decoder never holds more than one frame.
//!
//! # Example
//!
//! ```
//! use ohand_client::protocol::{encode_frame, FrameDecoder};
//!
//! let mut decoder = FrameDecoder::new(0x01);
//! let bytes = encode_frame(0x01, 0x02, 0x0B, &[0x00, 0x10, 0x00]).unwrap();
//!
//! decoder.push(&bytes);
//! let frame = decoder.take_frame().unwrap();
//! assert_eq!(frame.src, 0x02);
//! assert_eq!(frame.payload(), &[0x00, 0x10, 0x00]);
//! ```

use super::frame::Frame;
use super::wire_format::{CAPTURE_SIZE, HEADER_0, HEADER_1, MAX_PROTOCOL_DATA_SIZE};

/// Arena offsets for captured fields.
const DEST: usize = 0;
const SRC: usize = 1;
const COMMAND: usize = 2;
const LENGTH: usize = 3;
const PAYLOAD: usize = 4;

/// State machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// Waiting for `0x55`.
    AwaitHeader0,
    /// Waiting for `0xAA`.
    AwaitHeader1,
    /// Waiting for the destination address.
    AwaitDestAddr,
    /// Waiting for the source address.
    AwaitSrcAddr,
    /// Waiting for the command byte.
    AwaitCommand,
    /// Waiting for the payload length.
    AwaitLength,
    /// Capturing payload; `remaining` bytes still to come (never zero).
    AwaitPayload { remaining: u8 },
    /// Waiting for the LRC byte.
    AwaitChecksum,
}

impl DecoderPhase {
    /// Phase a fresh decoder starts in.
    pub const INITIAL: Self = Self::AwaitHeader0;
}

/// Byte-at-a-time decoder holding at most one completed frame.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    /// Address frames must be sent to in order to be accepted.
    local_address: u8,
    /// Current parsing phase.
    phase: DecoderPhase,
    /// Captured dest, src, command, length, payload and LRC.
    arena: [u8; CAPTURE_SIZE],
    /// A complete frame for us sits in `arena`.
    ready: bool,
}

impl FrameDecoder {
    /// Create a decoder accepting frames addressed to `local_address`.
    pub fn new(local_address: u8) -> Self {
        Self {
            local_address,
            phase: DecoderPhase::INITIAL,
            arena: [0u8; CAPTURE_SIZE],
            ready: false,
        }
    }

    /// Address this decoder accepts frames for.
    #[inline]
    pub fn local_address(&self) -> u8 {
        self.local_address
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> DecoderPhase {
        self.phase
    }

    /// Check if a completed frame is waiting to be taken.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Feed one byte.
    ///
    /// Returns `true` if this byte completed a frame addressed to us.
    pub fn push_byte(&mut self, byte: u8) -> bool {
        if self.ready {
            tracing::trace!("Decoder holds an unconsumed frame, dropping byte {:#04x}", byte);
            return false;
        }

        self.phase = match self.phase {
            DecoderPhase::AwaitHeader0 => {
                if byte == HEADER_0 {
                    DecoderPhase::AwaitHeader1
                } else {
                    DecoderPhase::AwaitHeader0
                }
            }
            DecoderPhase::AwaitHeader1 => match byte {
                HEADER_1 => DecoderPhase::AwaitDestAddr,
                // A repeated first header byte starts a new candidate.
                HEADER_0 => DecoderPhase::AwaitHeader1,
                _ => DecoderPhase::AwaitHeader0,
            },
            DecoderPhase::AwaitDestAddr => {
                self.arena[DEST] = byte;
                DecoderPhase::AwaitSrcAddr
            }
            DecoderPhase::AwaitSrcAddr => {
                self.arena[SRC] = byte;
                DecoderPhase::AwaitCommand
            }
            DecoderPhase::AwaitCommand => {
                self.arena[COMMAND] = byte;
                DecoderPhase::AwaitLength
            }
            DecoderPhase::AwaitLength => {
                self.arena[LENGTH] = byte;
                if byte as usize > MAX_PROTOCOL_DATA_SIZE {
                    tracing::trace!("Declared length {} exceeds maximum, resync", byte);
                    DecoderPhase::AwaitHeader0
                } else if byte == 0 {
                    DecoderPhase::AwaitChecksum
                } else {
                    DecoderPhase::AwaitPayload { remaining: byte }
                }
            }
            DecoderPhase::AwaitPayload { remaining } => {
                let len = self.arena[LENGTH];
                let offset = PAYLOAD + (len - remaining) as usize;
                self.arena[offset] = byte;
                match remaining - 1 {
                    0 => DecoderPhase::AwaitChecksum,
                    remaining => DecoderPhase::AwaitPayload { remaining },
                }
            }
            DecoderPhase::AwaitChecksum => {
                self.arena[self.checksum_offset()] = byte;
                if self.arena[DEST] == self.local_address {
                    self.ready = true;
                } else {
                    tracing::trace!(
                        "Dropping frame for {:#04x} (local {:#04x})",
                        self.arena[DEST],
                        self.local_address
                    );
                }
                DecoderPhase::INITIAL
            }
        };

        self.ready
    }

    /// Feed a chunk of bytes.
    ///
    /// Returns `true` if a completed frame is ready afterwards.
    pub fn push(&mut self, data: &[u8]) -> bool {
        for &byte in data {
            self.push_byte(byte);
        }
        self.ready
    }

    /// Peek at the ready frame without consuming it.
    pub fn pending(&self) -> Option<Frame> {
        self.ready.then(|| self.captured_frame())
    }

    /// Take the ready frame, freeing the decoder for the next one.
    pub fn take_frame(&mut self) -> Option<Frame> {
        let frame = self.pending()?;
        self.ready = false;
        Some(frame)
    }

    /// Return to the initial phase and drop any ready frame.
    pub fn reset(&mut self) {
        self.phase = DecoderPhase::INITIAL;
        self.ready = false;
    }

    #[inline]
    fn checksum_offset(&self) -> usize {
        PAYLOAD + self.arena[LENGTH] as usize
    }

    fn captured_frame(&self) -> Frame {
        let end = self.checksum_offset();
        Frame::from_wire(
            self.arena[DEST],
            self.arena[SRC],
            self.arena[COMMAND],
            &self.arena[PAYLOAD..end],
            self.arena[end],
        )
    }
}

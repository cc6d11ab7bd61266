//! Wire format encoding.
//!
//! Every frame on UART and CAN shares the same layout:
//! ```text
//! ┌──────┬──────┬──────┬──────┬─────────┬────────┬──────────────┬─────┐
//! │ 0x55 │ 0xAA │ Dest │ Src  │ Command │ Length │ Payload      │ LRC │
//! │      │      │ 1 B  │ 1 B  │ 1 B     │ 1 B    │ 0..=64 bytes │ 1 B │
//! └──────┴──────┴──────┴──────┴─────────┴────────┴──────────────┴─────┘
//! ```
//!
//! The LRC is the XOR of every byte from `Dest` through the last payload byte.
//! Bit 7 of `Command` is set by the hand when it answers with an error.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{HandError, Result};

/// First header byte.
pub const HEADER_0: u8 = 0x55;

/// Second header byte.
pub const HEADER_1: u8 = 0xAA;

/// Maximum payload length a frame may declare.
pub const MAX_PROTOCOL_DATA_SIZE: usize = 64;

/// Maximum payload length the master may send (one below the decode limit).
pub const MAX_SEND_PAYLOAD_SIZE: usize = MAX_PROTOCOL_DATA_SIZE - 1;

/// Header bytes + dest + src + command + length.
pub const FRAME_PREFIX_SIZE: usize = 6;

/// Prefix + LRC.
pub const FRAME_OVERHEAD: usize = FRAME_PREFIX_SIZE + 1;

/// Size of the decoder's capture arena: dest, src, command, length, payload, LRC.
pub const CAPTURE_SIZE: usize = MAX_PROTOCOL_DATA_SIZE + 5;

/// Response address wildcard.
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Command bit marking an error response.
pub const CMD_ERROR_MASK: u8 = 0b1000_0000;

/// XOR checksum over a byte span.
///
/// # Example
///
/// ```
/// use ohand_client::protocol::lrc;
///
/// assert_eq!(lrc(&[0x01, 0x02, 0x03]), 0x00);
/// assert_eq!(lrc(&[]), 0x00);
/// ```
#[inline]
pub fn lrc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Checksum for a frame, computed over its dest..payload span.
///
/// Only meaningful for payloads of at most [`MAX_PROTOCOL_DATA_SIZE`] bytes,
/// the largest length the frame's length byte carries.
pub fn frame_lrc(dest: u8, src: u8, command: u8, payload: &[u8]) -> u8 {
    dest ^ src ^ command ^ (payload.len() as u8) ^ lrc(payload)
}

/// Encode a complete frame ready for the transport.
///
/// Rejects payloads longer than [`MAX_SEND_PAYLOAD_SIZE`].
///
/// # Example
///
/// ```
/// use ohand_client::protocol::encode_frame;
///
/// let bytes = encode_frame(0x02, 0x01, 0x00, &[]).unwrap();
/// assert_eq!(&bytes[..], &[0x55, 0xAA, 0x02, 0x01, 0x00, 0x00, 0x03]);
/// ```
pub fn encode_frame(dest: u8, src: u8, command: u8, payload: &[u8]) -> Result<Bytes> {
    if payload.len() > MAX_SEND_PAYLOAD_SIZE {
        return Err(HandError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_SEND_PAYLOAD_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload.len());
    buf.put_u8(HEADER_0);
    buf.put_u8(HEADER_1);
    buf.put_u8(dest);
    buf.put_u8(src);
    buf.put_u8(command);
    buf.put_u8(payload.len() as u8);
    buf.put_slice(payload);
    buf.put_u8(frame_lrc(dest, src, command, payload));
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lrc_over_span() {
        assert_eq!(lrc(&[0xFF]), 0xFF);
        assert_eq!(lrc(&[0xFF, 0xFF]), 0x00);
        assert_eq!(lrc(&[0x02, 0x01, 0x4C, 0x04]), 0x02 ^ 0x01 ^ 0x4C ^ 0x04);
    }

    #[test]
    fn test_frame_lrc_matches_span_lrc() {
        let payload = [0x03, 0x10, 0x27, 0xFF];
        let span = [&[0x02, 0x01, 0x4C, 0x04][..], &payload[..]].concat();
        assert_eq!(frame_lrc(0x02, 0x01, 0x4C, &payload), lrc(&span));
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode_frame(0x02, 0x01, 0x4C, &[0x03, 0x10, 0x27, 0xFF]).unwrap();

        assert_eq!(bytes.len(), FRAME_OVERHEAD + 4);
        assert_eq!(bytes[0], HEADER_0);
        assert_eq!(bytes[1], HEADER_1);
        assert_eq!(bytes[2], 0x02);
        assert_eq!(bytes[3], 0x01);
        assert_eq!(bytes[4], 0x4C);
        assert_eq!(bytes[5], 4);
        assert_eq!(&bytes[6..10], &[0x03, 0x10, 0x27, 0xFF]);
        assert_eq!(bytes[10], lrc(&bytes[2..10]));
    }

    #[test]
    fn test_encode_max_payload() {
        let payload = [0xA5; MAX_SEND_PAYLOAD_SIZE];
        let bytes = encode_frame(0x02, 0x01, 0x5F, &payload).unwrap();
        assert_eq!(bytes.len(), FRAME_OVERHEAD + MAX_SEND_PAYLOAD_SIZE);
    }

    #[test]
    fn test_encode_payload_too_large() {
        let payload = [0u8; MAX_PROTOCOL_DATA_SIZE];
        let result = encode_frame(0x02, 0x01, 0x5F, &payload);
        assert!(matches!(
            result,
            Err(HandError::PayloadTooLarge { len: 64, max: 63 })
        ));
    }
}

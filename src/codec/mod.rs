//! Codec module - payload layouts for hand commands.
//!
//! This module turns structured values into request payloads and response
//! payloads back into structured values:
//!
//! - [`PayloadReader`] / [`PayloadWriter`] - checked little-endian field access
//! - [`WireValue`] - 16-bit motor values (`u16` positions, `i16` angles)
//! - [`motors`] - "all motors" set/get blocks
//! - [`custom`] - the batched custom command
//! - [`calibration`] - calibration data layout
//!
//! Every read is bounds-checked; a payload that ends early is
//! [`HandError::DataInvalid`](crate::HandError::DataInvalid), never a panic.
//!
//! # Example
//!
//! ```
//! use ohand_client::codec::{PayloadReader, PayloadWriter};
//!
//! let mut writer = PayloadWriter::new();
//! writer.put_u8(2).put_u16(1000).put_i16(-250);
//! let payload = writer.finish();
//!
//! let mut reader = PayloadReader::new(&payload);
//! assert_eq!(reader.u8().unwrap(), 2);
//! assert_eq!(reader.u16().unwrap(), 1000);
//! assert_eq!(reader.i16().unwrap(), -250);
//! assert!(reader.u8().is_err());
//! ```

pub mod calibration;
pub mod custom;
pub mod motors;

pub use calibration::CalibrationData;
pub use custom::{CustomRequest, CustomResponse, SubCommand};
pub use motors::MotorValues;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{HandError, Result};
use crate::protocol::MAX_PROTOCOL_DATA_SIZE;

/// Cursor over a response payload with checked reads.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    buf: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    /// Start reading at the beginning of `payload`.
    #[inline]
    pub fn new(payload: &'a [u8]) -> Self {
        Self { buf: payload }
    }

    /// Bytes not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.buf.len() < n {
            return Err(HandError::invalid(format!(
                "payload truncated: need {} more bytes, have {}",
                n,
                self.buf.len()
            )));
        }
        Ok(())
    }

    /// Read one byte.
    pub fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    /// Read a little-endian `u16`.
    pub fn u16(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    /// Read a little-endian `i16`.
    pub fn i16(&mut self) -> Result<i16> {
        self.need(2)?;
        Ok(self.buf.get_i16_le())
    }

    /// Read a little-endian `u32`.
    pub fn u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    /// Read a little-endian IEEE-754 `f32`.
    pub fn f32(&mut self) -> Result<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    /// Read `N` raw bytes.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.need(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Read `n` raw bytes.
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    /// Read a value of any [`WireValue`] type.
    #[inline]
    pub fn value<T: WireValue>(&mut self) -> Result<T> {
        T::read(self)
    }

    /// Read a finger id and check it echoes the requested one.
    pub fn finger(&mut self, expected: u8) -> Result<u8> {
        let finger = self.u8()?;
        if finger != expected {
            return Err(HandError::invalid(format!(
                "response for finger {} while asking for finger {}",
                finger, expected
            )));
        }
        Ok(finger)
    }
}

/// Builder for a request payload.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: BytesMut,
}

impl PayloadWriter {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(MAX_PROTOCOL_DATA_SIZE),
        }
    }

    /// Append one byte.
    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    /// Append a little-endian `u16`.
    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.buf.put_u16_le(value);
        self
    }

    /// Append a little-endian `i16`.
    pub fn put_i16(&mut self, value: i16) -> &mut Self {
        self.buf.put_i16_le(value);
        self
    }

    /// Append a little-endian `f32`.
    pub fn put_f32(&mut self, value: f32) -> &mut Self {
        self.buf.put_f32_le(value);
        self
    }

    /// Append raw bytes.
    pub fn put_slice(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Append a value of any [`WireValue`] type.
    pub fn put<T: WireValue>(&mut self, value: T) -> &mut Self {
        value.write(self);
        self
    }

    /// Current payload length.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing was written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freeze into an immutable payload.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// A 16-bit per-motor value as carried on the wire.
pub trait WireValue: Copy + Default {
    /// Encoded width in bytes.
    const WIDTH: usize = 2;

    /// Read one value.
    fn read(reader: &mut PayloadReader<'_>) -> Result<Self>;

    /// Append one value.
    fn write(self, writer: &mut PayloadWriter);
}

impl WireValue for u16 {
    fn read(reader: &mut PayloadReader<'_>) -> Result<Self> {
        reader.u16()
    }

    fn write(self, writer: &mut PayloadWriter) {
        writer.put_u16(self);
    }
}

impl WireValue for i16 {
    fn read(reader: &mut PayloadReader<'_>) -> Result<Self> {
        reader.i16()
    }

    fn write(self, writer: &mut PayloadWriter) {
        writer.put_i16(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut writer = PayloadWriter::new();
        writer.put_u16(0x1234).put_i16(-2).put_f32(1.0);
        let payload = writer.finish();

        assert_eq!(&payload[..4], &[0x34, 0x12, 0xFE, 0xFF]);
        assert_eq!(&payload[4..], &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_reader_truncated() {
        let mut reader = PayloadReader::new(&[0x01]);
        assert!(matches!(reader.u16(), Err(HandError::DataInvalid(_))));
        // Failed read consumes nothing.
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.u8().unwrap(), 1);
    }

    #[test]
    fn test_reader_f32_and_u32() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&250.5f32.to_le_bytes());
        bytes.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let mut reader = PayloadReader::new(&bytes);
        assert_eq!(reader.f32().unwrap(), 250.5);
        assert_eq!(reader.u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_arrays() {
        let mut reader = PayloadReader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(reader.array::<2>().unwrap(), [1, 2]);
        assert_eq!(reader.bytes(2).unwrap(), &[3, 4]);
        assert!(reader.bytes(2).is_err());
    }

    #[test]
    fn test_finger_echo() {
        assert_eq!(PayloadReader::new(&[3]).finger(3).unwrap(), 3);
        assert!(matches!(
            PayloadReader::new(&[4]).finger(3),
            Err(HandError::DataInvalid(_))
        ));
    }

    #[test]
    fn test_wire_value_generic() {
        let mut writer = PayloadWriter::new();
        writer.put(500u16).put(-9000i16);
        assert_eq!(writer.len(), 4);

        let payload = writer.finish();
        let mut reader = PayloadReader::new(&payload);
        assert_eq!(reader.value::<u16>().unwrap(), 500);
        assert_eq!(reader.value::<i16>().unwrap(), -9000);
    }
}

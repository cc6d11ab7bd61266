//! Structured values returned by hand commands.
//!
//! Each type knows how to read itself from a response payload. Per-finger
//! responses start with the finger id, which is checked against the request.

use std::fmt;

use serde::Serialize;

use crate::codec::{PayloadReader, PayloadWriter, WireValue};
use crate::error::{HandError, Result};

/// Maximum number of force sensor entries one finger reports.
pub const MAX_FORCE_ENTRIES: usize = 60;

/// Protocol version implemented by the hand firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion {
    /// Incompatible revisions.
    pub major: u8,
    /// Backward-compatible additions.
    pub minor: u8,
}

impl ProtocolVersion {
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        let minor = r.u8()?;
        let major = r.u8()?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirmwareVersion {
    /// Major release.
    pub major: u8,
    /// Minor release.
    pub minor: u8,
    /// Build revision.
    pub revision: u16,
}

impl FirmwareVersion {
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        let revision = r.u16()?;
        let minor = r.u8()?;
        let major = r.u8()?;
        Ok(Self {
            major,
            minor,
            revision,
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Hardware and bootloader version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwareVersion {
    /// Hand model.
    pub hw_type: u8,
    /// Board revision.
    pub hw_ver: u8,
    /// Bootloader major version.
    pub boot_major: u8,
    /// Bootloader minor version.
    pub boot_minor: u8,
}

impl HardwareVersion {
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let [hw_type, hw_ver, boot_major, boot_minor] = PayloadReader::new(payload).array()?;
        Ok(Self {
            hw_type,
            hw_ver,
            boot_major,
            boot_minor,
        })
    }

    /// Bootloader version as one number, major in the high byte.
    #[inline]
    pub fn boot_version(&self) -> u16 {
        (u16::from(self.boot_major) << 8) | u16::from(self.boot_minor)
    }
}

/// PID controller gains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pid {
    /// Proportional gain.
    pub p: f32,
    /// Integral gain.
    pub i: f32,
    /// Derivative gain.
    pub d: f32,
    /// Overall output gain.
    pub g: f32,
}

impl Pid {
    /// Gains in wire order.
    pub fn new(p: f32, i: f32, d: f32, g: f32) -> Self {
        Self { p, i, d, g }
    }

    pub(crate) fn read(r: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            p: r.f32()?,
            i: r.f32()?,
            d: r.f32()?,
            g: r.f32()?,
        })
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_f32(self.p).put_f32(self.i).put_f32(self.d).put_f32(self.g);
    }
}

/// Target and measured value of one finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FingerValue<T> {
    /// Commanded value.
    pub target: T,
    /// Measured value.
    pub current: T,
}

impl<T: WireValue> FingerValue<T> {
    pub(crate) fn read(r: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            target: r.value()?,
            current: r.value()?,
        })
    }
}

/// Allowed position range of one finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PosLimit {
    /// Lower bound.
    pub low: u16,
    /// Upper bound.
    pub high: u16,
}

/// Thumb root position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThumbRootPos {
    /// Raw encoder reading.
    pub raw_encoder: u16,
    /// Position index 0, 1 or 2; [`ThumbRootPos::INVALID`] between positions.
    pub pos: u8,
}

impl ThumbRootPos {
    /// Reported while the thumb root is not at any known position.
    pub const INVALID: u8 = 0xFF;

    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        Ok(Self {
            raw_encoder: r.u16()?,
            pos: r.u8()?,
        })
    }

    /// Check if the thumb root sits at a known position.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.pos != Self::INVALID
    }
}

/// Stall detection parameters of one finger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StopParams {
    /// Speed below which the finger counts as stalled.
    pub speed: u16,
    /// Current above which the finger counts as stalled.
    pub stop_current: u16,
    /// Stall duration before the motor stops, in ms.
    pub stop_after_period: u16,
    /// Wait before retrying a stalled move, in ms.
    pub retry_interval: u16,
}

impl StopParams {
    pub(crate) fn read(r: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            speed: r.u16()?,
            stop_current: r.u16()?,
            stop_after_period: r.u16()?,
            retry_interval: r.u16()?,
        })
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_u16(self.speed)
            .put_u16(self.stop_current)
            .put_u16(self.stop_after_period)
            .put_u16(self.retry_interval);
    }
}

/// 96-bit unique device id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Uid(pub [u32; 3]);

impl Uid {
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        Ok(Self([r.u32()?, r.u32()?, r.u32()?]))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [w0, w1, w2] = self.0;
        write!(f, "{:08X}-{:08X}-{:08X}", w0, w1, w2)
    }
}

/// Lifetime usage counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageStat {
    /// Total powered time.
    pub total_use_time: u32,
    /// Open count per motor.
    pub total_open_times: Vec<u32>,
}

impl UsageStat {
    /// Decode a response holding counters for up to `motor_cnt` motors.
    ///
    /// A shorter response yields fewer counters.
    pub(crate) fn decode(payload: &[u8], motor_cnt: usize) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        let total_use_time = r.u32()?;
        let available = r.remaining() / 4;
        let total_open_times = (0..motor_cnt.min(available))
            .map(|_| r.u32())
            .collect::<Result<_>>()?;
        Ok(Self {
            total_use_time,
            total_open_times,
        })
    }
}

/// Factory data written at manufacture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufactureData {
    /// Model variant.
    pub sub_model: u8,
    /// Hardware revision.
    pub hw_revision: u8,
    /// Serial number bytes.
    pub serial_number: [u8; 16],
    /// Customer-specific tag bytes.
    pub customer_tag: [u8; 8],
}

impl ManufactureData {
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        let mut r = PayloadReader::new(payload);
        Ok(Self {
            sub_model: r.u8()?,
            hw_revision: r.u8()?,
            serial_number: r.array()?,
            customer_tag: r.array()?,
        })
    }

    pub(crate) fn write(&self, w: &mut PayloadWriter) {
        w.put_u8(self.sub_model)
            .put_u8(self.hw_revision)
            .put_slice(&self.serial_number)
            .put_slice(&self.customer_tag);
    }

    /// Serial number as printed on the label: each byte in decimal, concatenated.
    pub fn serial_number_string(&self) -> String {
        digits(&self.serial_number)
    }

    /// Customer tag in the same decimal rendering.
    pub fn customer_tag_string(&self) -> String {
        digits(&self.customer_tag)
    }
}

fn digits(bytes: &[u8]) -> String {
    bytes.iter().map(u8::to_string).collect()
}

/// Power-on self test depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum SelfTestLevel {
    /// Wait for an explicit start command.
    Wait = 0,
    /// Quick self test.
    Semi = 1,
    /// Full self test.
    Full = 2,
}

impl TryFrom<u8> for SelfTestLevel {
    type Error = HandError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            0 => Ok(Self::Wait),
            1 => Ok(Self::Semi),
            2 => Ok(Self::Full),
            other => Err(HandError::invalid(format!("unknown self test level {}", other))),
        }
    }
}

/// Read the finger id echo and check it.
pub(crate) fn finger_payload<'a>(payload: &'a [u8], finger: u8) -> Result<PayloadReader<'a>> {
    let mut r = PayloadReader::new(payload);
    r.finger(finger)?;
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_version_order() {
        let v = ProtocolVersion::decode(&[3, 1]).unwrap();
        assert_eq!(v, ProtocolVersion { major: 1, minor: 3 });
        assert_eq!(v.to_string(), "1.3");
    }

    #[test]
    fn test_firmware_version() {
        let v = FirmwareVersion::decode(&[0x34, 0x12, 5, 3]).unwrap();
        assert_eq!(v.revision, 0x1234);
        assert_eq!(v.to_string(), "3.5.4660");
    }

    #[test]
    fn test_boot_version_major_high() {
        let v = HardwareVersion::decode(&[1, 2, 0x03, 0x04]).unwrap();
        assert_eq!(v.boot_version(), 0x0304);
    }

    #[test]
    fn test_short_payloads_are_invalid() {
        assert!(matches!(
            HardwareVersion::decode(&[1, 2, 3]),
            Err(HandError::DataInvalid(_))
        ));
        assert!(Uid::decode(&[0; 11]).is_err());
        assert!(ThumbRootPos::decode(&[0; 2]).is_err());
    }

    #[test]
    fn test_uid_display() {
        let uid = Uid::decode(&[1, 0, 0, 0, 0xEF, 0xBE, 0xAD, 0xDE, 0, 0, 0, 0x80]).unwrap();
        assert_eq!(uid.0, [1, 0xDEAD_BEEF, 0x8000_0000]);
        assert_eq!(uid.to_string(), "00000001-DEADBEEF-80000000");
    }

    #[test]
    fn test_usage_stat_limits_counters() {
        let mut payload = vec![10, 0, 0, 0];
        for n in 1..=6u32 {
            payload.extend_from_slice(&n.to_le_bytes());
        }

        let stat = UsageStat::decode(&payload, 3).unwrap();
        assert_eq!(stat.total_use_time, 10);
        assert_eq!(stat.total_open_times, vec![1, 2, 3]);

        let stat = UsageStat::decode(&payload[..12], 6).unwrap();
        assert_eq!(stat.total_open_times, vec![1, 2]);
    }

    #[test]
    fn test_manufacture_data_strings() {
        let mut payload = vec![7, 2];
        payload.extend_from_slice(&[1, 23, 0, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        payload.extend_from_slice(&[0, 0, 0, 0, 0, 0, 1, 255]);

        let data = ManufactureData::decode(&payload).unwrap();
        assert_eq!(data.sub_model, 7);
        assert_eq!(data.serial_number_string(), "123045678910111213141516");
        assert_eq!(data.customer_tag_string(), "0000001255");

        let mut w = PayloadWriter::new();
        data.write(&mut w);
        assert_eq!(&w.finish()[..], &payload[..]);
    }

    #[test]
    fn test_thumb_root_invalid() {
        let pos = ThumbRootPos::decode(&[0x10, 0x00, 0xFF]).unwrap();
        assert_eq!(pos.raw_encoder, 16);
        assert!(!pos.is_valid());
    }

    #[test]
    fn test_self_test_level() {
        assert_eq!(SelfTestLevel::try_from(2).unwrap(), SelfTestLevel::Full);
        assert!(SelfTestLevel::try_from(3).is_err());
    }

    #[test]
    fn test_pid_layout() {
        let pid = Pid::new(1.0, 0.5, 0.25, 2.0);
        let mut w = PayloadWriter::new();
        pid.write(&mut w);
        let payload = w.finish();
        assert_eq!(payload.len(), 16);
        assert_eq!(Pid::read(&mut PayloadReader::new(&payload)).unwrap(), pid);
    }

    #[test]
    fn test_finger_payload_echo() {
        let mut r = finger_payload(&[2, 0x10, 0x00], 2).unwrap();
        assert_eq!(r.u16().unwrap(), 16);
        assert!(finger_payload(&[3, 0, 0], 2).is_err());
        assert!(finger_payload(&[], 2).is_err());
    }
}

//! Batched custom command (0x5F).
//!
//! One round trip can set speeds, positions and angles of every motor and
//! fetch any combination of positions, angles, currents, forces and status.
//! Byte 0 of the request is a [`SubCommand`] mask; the set arrays follow in
//! mask order. The response carries the requested get fields in mask order,
//! each as one block covering every motor.
//!
//! # Example
//!
//! ```
//! use ohand_client::codec::{CustomRequest, CustomResponse, SubCommand};
//!
//! let request = CustomRequest::new()
//!     .with_position(vec![100, 200, 300])
//!     .with_speed(vec![10, 20, 30])
//!     .get(SubCommand::GET_POS | SubCommand::GET_STATUS);
//! let payload = request.encode().unwrap();
//! assert_eq!(payload[0], 0b1000_1011);
//!
//! let reply = [100, 0, 200, 0, 44, 1, 0, 1, 2];
//! let response = CustomResponse::decode(request.get_flags(), &reply).unwrap();
//! assert_eq!(response.motor_count, 3);
//! assert_eq!(response.position, Some(vec![100, 200, 300]));
//! assert_eq!(response.status, Some(vec![0, 1, 2]));
//! ```

use bitflags::bitflags;
use bytes::Bytes;
use serde::Serialize;

use super::motors::MAX_MOTOR_CNT;
use super::{PayloadReader, PayloadWriter, WireValue};
use crate::error::{HandError, Result};

bitflags! {
    /// Field selector carried in byte 0 of a custom request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SubCommand: u8 {
        /// Request carries a speed per motor.
        const SET_SPEED = 1 << 0;
        /// Request carries a position per motor.
        const SET_POS = 1 << 1;
        /// Request carries an angle per motor.
        const SET_ANGLE = 1 << 2;
        /// Response carries a position per motor.
        const GET_POS = 1 << 3;
        /// Response carries an angle per motor.
        const GET_ANGLE = 1 << 4;
        /// Response carries a current per motor.
        const GET_CURRENT = 1 << 5;
        /// Response carries a force per motor.
        const GET_FORCE = 1 << 6;
        /// Response carries a status byte per motor.
        const GET_STATUS = 1 << 7;
    }
}

impl SubCommand {
    /// All set selectors.
    pub const SET_ALL: Self = Self::SET_SPEED.union(Self::SET_POS).union(Self::SET_ANGLE);

    /// All get selectors.
    pub const GET_ALL: Self = Self::GET_POS
        .union(Self::GET_ANGLE)
        .union(Self::GET_CURRENT)
        .union(Self::GET_FORCE)
        .union(Self::GET_STATUS);

    /// Response bytes per motor for the selected get fields.
    pub fn response_width(self) -> usize {
        let words = [
            Self::GET_POS,
            Self::GET_ANGLE,
            Self::GET_CURRENT,
            Self::GET_FORCE,
        ]
        .iter()
        .filter(|&&flag| self.contains(flag))
        .count();
        let status = usize::from(self.contains(Self::GET_STATUS));
        words * 2 + status
    }
}

/// A custom command request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomRequest {
    /// Speed per motor.
    pub speed: Option<Vec<u16>>,
    /// Position per motor.
    pub position: Option<Vec<u16>>,
    /// Angle per motor, in centidegrees.
    pub angle: Option<Vec<i16>>,
    /// Requested get fields; set bits are ignored.
    pub get: SubCommand,
}

impl CustomRequest {
    /// Create a request that sets and gets nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set speeds.
    pub fn with_speed(mut self, speed: Vec<u16>) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set positions.
    pub fn with_position(mut self, position: Vec<u16>) -> Self {
        self.position = Some(position);
        self
    }

    /// Set angles.
    pub fn with_angle(mut self, angle: Vec<i16>) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Add get fields to the response.
    pub fn get(mut self, flags: SubCommand) -> Self {
        self.get |= flags & SubCommand::GET_ALL;
        self
    }

    /// Get fields the response will carry.
    #[inline]
    pub fn get_flags(&self) -> SubCommand {
        self.get & SubCommand::GET_ALL
    }

    /// Full mask byte for this request.
    pub fn mask(&self) -> SubCommand {
        let mut mask = self.get_flags();
        mask.set(SubCommand::SET_SPEED, self.speed.is_some());
        mask.set(SubCommand::SET_POS, self.position.is_some());
        mask.set(SubCommand::SET_ANGLE, self.angle.is_some());
        mask
    }

    /// Motor count shared by every set array (0 when nothing is set).
    pub fn motor_count(&self) -> Result<usize> {
        let lengths = [
            self.speed.as_ref().map(Vec::len),
            self.position.as_ref().map(Vec::len),
            self.angle.as_ref().map(Vec::len),
        ];

        let mut count = None;
        for len in lengths.into_iter().flatten() {
            match count {
                None => count = Some(len),
                Some(n) if n != len => {
                    return Err(HandError::invalid(format!(
                        "custom set arrays differ in length: {} and {}",
                        n, len
                    )));
                }
                Some(_) => {}
            }
        }

        let count = count.unwrap_or(0);
        if count > MAX_MOTOR_CNT {
            return Err(HandError::invalid(format!(
                "{} motors exceed maximum {}",
                count, MAX_MOTOR_CNT
            )));
        }
        Ok(count)
    }

    /// Encode the request payload.
    pub fn encode(&self) -> Result<Bytes> {
        self.motor_count()?;

        let mut writer = PayloadWriter::new();
        writer.put_u8(self.mask().bits());
        if let Some(speed) = &self.speed {
            put_all(&mut writer, speed);
        }
        if let Some(position) = &self.position {
            put_all(&mut writer, position);
        }
        if let Some(angle) = &self.angle {
            put_all(&mut writer, angle);
        }
        Ok(writer.finish())
    }
}

/// A decoded custom command response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomResponse {
    /// Number of motors covered by each returned field.
    pub motor_count: usize,
    /// Position per motor, if requested.
    pub position: Option<Vec<u16>>,
    /// Angle per motor, if requested.
    pub angle: Option<Vec<i16>>,
    /// Current per motor, if requested.
    pub current: Option<Vec<u16>>,
    /// Force per motor, if requested.
    pub force: Option<Vec<u16>>,
    /// Status byte per motor, if requested.
    pub status: Option<Vec<u8>>,
}

impl CustomResponse {
    /// Decode a response carrying the fields selected by `get`.
    pub fn decode(get: SubCommand, payload: &[u8]) -> Result<Self> {
        let width = get.response_width();
        if width == 0 {
            return Ok(Self::default());
        }
        if payload.len() % width != 0 {
            return Err(HandError::invalid(format!(
                "custom response of {} bytes is not a multiple of {}",
                payload.len(),
                width
            )));
        }

        let count = payload.len() / width;
        let mut reader = PayloadReader::new(payload);
        let mut response = Self {
            motor_count: count,
            ..Self::default()
        };

        if get.contains(SubCommand::GET_POS) {
            response.position = Some(read_all(&mut reader, count)?);
        }
        if get.contains(SubCommand::GET_ANGLE) {
            response.angle = Some(read_all(&mut reader, count)?);
        }
        if get.contains(SubCommand::GET_CURRENT) {
            response.current = Some(read_all(&mut reader, count)?);
        }
        if get.contains(SubCommand::GET_FORCE) {
            response.force = Some(read_all(&mut reader, count)?);
        }
        if get.contains(SubCommand::GET_STATUS) {
            response.status = Some(reader.bytes(count)?.to_vec());
        }
        Ok(response)
    }
}

fn put_all<T: WireValue>(writer: &mut PayloadWriter, values: &[T]) {
    for &value in values {
        writer.put(value);
    }
}

fn read_all<T: WireValue>(reader: &mut PayloadReader<'_>, count: usize) -> Result<Vec<T>> {
    (0..count).map(|_| reader.value()).collect()
}

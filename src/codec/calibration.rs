//! Calibration data layout.
//!
//! The get and set forms order their counts differently:
//!
//! ```text
//! get response: [motor_cnt][thumb_cnt][end × n][start × n][thumb × m]
//! set request:  [motor_cnt][end × n][start × n][thumb_cnt][thumb × m]
//! ```

use bytes::Bytes;
use serde::Serialize;

use super::motors::MAX_MOTOR_CNT;
use super::{PayloadReader, PayloadWriter};
use crate::error::{HandError, Result};

/// Number of selectable thumb root positions.
pub const MAX_THUMB_ROOT_POS: usize = 3;

/// Per-motor travel limits and thumb root encoder positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalibrationData {
    /// Raw end position per motor.
    pub end_pos: Vec<u16>,
    /// Raw start position per motor.
    pub start_pos: Vec<u16>,
    /// Raw encoder value of each thumb root position.
    pub thumb_root_pos: Vec<u16>,
}

impl CalibrationData {
    /// Number of motors described.
    #[inline]
    pub fn motor_count(&self) -> usize {
        self.end_pos.len()
    }

    /// Decode a get response, accepting at most the given counts.
    ///
    /// Fails with `DataTooLarge` when the hand reports more motors or thumb
    /// positions than allowed.
    pub fn decode(payload: &[u8], max_motors: usize, max_thumb_pos: usize) -> Result<Self> {
        let mut reader = PayloadReader::new(payload);
        let motor_cnt = usize::from(reader.u8()?);
        let thumb_cnt = usize::from(reader.u8()?);

        if motor_cnt > max_motors || thumb_cnt > max_thumb_pos {
            return Err(HandError::DataTooLarge);
        }

        let mut read = |n: usize| (0..n).map(|_| reader.u16()).collect::<Result<Vec<_>>>();
        let end_pos = read(motor_cnt)?;
        let start_pos = read(motor_cnt)?;
        let thumb_root_pos = read(thumb_cnt)?;

        Ok(Self {
            end_pos,
            start_pos,
            thumb_root_pos,
        })
    }

    /// Encode a set request.
    pub fn encode(&self) -> Result<Bytes> {
        if self.end_pos.len() != self.start_pos.len() {
            return Err(HandError::invalid(format!(
                "{} end positions but {} start positions",
                self.end_pos.len(),
                self.start_pos.len()
            )));
        }
        if self.end_pos.len() > MAX_MOTOR_CNT {
            return Err(HandError::invalid(format!(
                "{} motors exceed maximum {}",
                self.end_pos.len(),
                MAX_MOTOR_CNT
            )));
        }
        if self.thumb_root_pos.len() > MAX_THUMB_ROOT_POS {
            return Err(HandError::invalid(format!(
                "{} thumb root positions exceed maximum {}",
                self.thumb_root_pos.len(),
                MAX_THUMB_ROOT_POS
            )));
        }

        let mut writer = PayloadWriter::new();
        // Lengths are bounded above, the casts cannot truncate.
        writer.put_u8(self.end_pos.len() as u8);
        for &v in self.end_pos.iter().chain(&self.start_pos) {
            writer.put_u16(v);
        }
        writer.put_u8(self.thumb_root_pos.len() as u8);
        for &v in &self.thumb_root_pos {
            writer.put_u16(v);
        }
        Ok(writer.finish())
    }
}

//! "All motors" payload blocks.
//!
//! Set requests carry one `(value, speed)` triple per motor. Get responses
//! carry two contiguous blocks, every motor's target then every motor's
//! current value, so the motor count is `len / 4`.

use bytes::Bytes;
use serde::Serialize;

use super::{PayloadReader, PayloadWriter, WireValue};
use crate::error::{HandError, Result};

/// Number of motors a hand can drive.
pub const MAX_MOTOR_CNT: usize = 6;

/// Width of one motor's entry in a get-all response (target + current).
const GET_ALL_ENTRY_SIZE: usize = 4;

/// Target and current value of every motor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotorValues<T> {
    /// Commanded values, one per motor.
    pub target: Vec<T>,
    /// Measured values, one per motor.
    pub current: Vec<T>,
}

impl<T: WireValue> MotorValues<T> {
    /// Number of motors reported.
    #[inline]
    pub fn motor_count(&self) -> usize {
        self.target.len()
    }

    /// Decode a get-all response holding at most `capacity` motors.
    pub fn decode(payload: &[u8], capacity: usize) -> Result<Self> {
        let count = motor_count(payload, capacity)?;
        let mut reader = PayloadReader::new(payload);

        let target = (0..count).map(|_| reader.value()).collect::<Result<_>>()?;
        let current = (0..count).map(|_| reader.value()).collect::<Result<_>>()?;
        Ok(Self { target, current })
    }
}

/// Decode a get-all response into caller buffers.
///
/// Returns the motor count. When the response holds more motors than
/// either buffer, fails with `DataTooLarge` and leaves both untouched.
pub fn decode_all_into<T: WireValue>(
    payload: &[u8],
    target: &mut [T],
    current: &mut [T],
) -> Result<usize> {
    let count = motor_count(payload, target.len().min(current.len()))?;
    let mut reader = PayloadReader::new(payload);

    for slot in target.iter_mut().take(count) {
        *slot = reader.value()?;
    }
    for slot in current.iter_mut().take(count) {
        *slot = reader.value()?;
    }
    Ok(count)
}

/// Encode a set-all request from per-motor values and speeds.
pub fn encode_all<T: WireValue>(values: &[T], speeds: &[u8]) -> Result<Bytes> {
    if values.len() != speeds.len() {
        return Err(HandError::invalid(format!(
            "{} values but {} speeds",
            values.len(),
            speeds.len()
        )));
    }
    if values.len() > MAX_MOTOR_CNT {
        return Err(HandError::invalid(format!(
            "{} motors exceed maximum {}",
            values.len(),
            MAX_MOTOR_CNT
        )));
    }

    let mut writer = PayloadWriter::new();
    for (&value, &speed) in values.iter().zip(speeds) {
        writer.put(value).put_u8(speed);
    }
    Ok(writer.finish())
}

fn motor_count(payload: &[u8], capacity: usize) -> Result<usize> {
    if payload.len() % GET_ALL_ENTRY_SIZE != 0 {
        return Err(HandError::invalid(format!(
            "all-motor response of {} bytes is not a multiple of {}",
            payload.len(),
            GET_ALL_ENTRY_SIZE
        )));
    }
    let count = payload.len() / GET_ALL_ENTRY_SIZE;
    if count > capacity {
        return Err(HandError::DataTooLarge);
    }
    Ok(count)
}

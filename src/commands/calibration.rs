//! Calibration commands.

use crate::client::OHand;
use crate::codec::calibration::MAX_THUMB_ROOT_POS;
use crate::codec::motors::MAX_MOTOR_CNT;
use crate::codec::CalibrationData;
use crate::error::Result;
use crate::protocol::{Command, MAX_PROTOCOL_DATA_SIZE};

/// Largest calibration response for the given limits: counts, end, start and
/// thumb positions, capped at one frame.
fn cali_response_size(max_motors: usize, max_thumb_pos: usize) -> usize {
    max_motors
        .saturating_mul(4)
        .saturating_add(max_thumb_pos.saturating_mul(2))
        .saturating_add(2)
        .min(MAX_PROTOCOL_DATA_SIZE)
}

impl OHand {
    /// Read calibration data for up to six motors and three thumb positions.
    pub fn get_cali_data(&mut self, hand_id: u8) -> Result<CalibrationData> {
        self.get_cali_data_with_capacity(hand_id, MAX_MOTOR_CNT, MAX_THUMB_ROOT_POS)
    }

    /// Read calibration data, failing with `DataTooLarge` when the hand
    /// reports more than `max_motors` motors or `max_thumb_pos` thumb positions.
    pub fn get_cali_data_with_capacity(
        &mut self,
        hand_id: u8,
        max_motors: usize,
        max_thumb_pos: usize,
    ) -> Result<CalibrationData> {
        let capacity = cali_response_size(max_motors, max_thumb_pos);
        let payload = self.request(hand_id, Command::GetCaliData, &[], capacity)?;
        CalibrationData::decode(&payload, max_motors, max_thumb_pos)
    }

    /// Write calibration data.
    pub fn set_cali_data(&mut self, hand_id: u8, data: &CalibrationData) -> Result<()> {
        self.execute(hand_id, Command::SetCaliData, &data.encode()?)
    }

    /// Start calibration, guarded by `key`.
    pub fn calibrate(&mut self, hand_id: u8, key: u16) -> Result<()> {
        self.execute(hand_id, Command::Calibrate, &key.to_le_bytes())
    }
}

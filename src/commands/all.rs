//! All-motor commands.
//!
//! Getters come in two forms: one returning [`MotorValues`] for up to
//! [`MAX_MOTOR_CNT`] motors, and an `_into` form filling caller slices whose
//! length is the capacity. Both reject responses describing more motors than
//! the capacity with `DataTooLarge`, without writing anything.

use crate::client::OHand;
use crate::codec::motors::{decode_all_into, encode_all, MAX_MOTOR_CNT};
use crate::codec::{MotorValues, WireValue};
use crate::error::Result;
use crate::protocol::{Command, MAX_PROTOCOL_DATA_SIZE};

impl OHand {
    /// Read target and current raw encoder position of every motor.
    pub fn get_finger_pos_abs_all(&mut self, hand_id: u8) -> Result<MotorValues<u16>> {
        self.get_all(hand_id, Command::GetFingerPosAbsAll)
    }

    /// Read target and current logical position of every motor.
    pub fn get_finger_pos_all(&mut self, hand_id: u8) -> Result<MotorValues<u16>> {
        self.get_all(hand_id, Command::GetFingerPosAll)
    }

    /// Read target and current angle of every motor.
    pub fn get_finger_angle_all(&mut self, hand_id: u8) -> Result<MotorValues<i16>> {
        self.get_all(hand_id, Command::GetFingerAngleAll)
    }

    /// Read raw encoder positions into caller buffers; returns the motor count.
    pub fn get_finger_pos_abs_all_into(
        &mut self,
        hand_id: u8,
        target: &mut [u16],
        current: &mut [u16],
    ) -> Result<usize> {
        self.get_all_into(hand_id, Command::GetFingerPosAbsAll, target, current)
    }

    /// Read logical positions into caller buffers; returns the motor count.
    pub fn get_finger_pos_all_into(
        &mut self,
        hand_id: u8,
        target: &mut [u16],
        current: &mut [u16],
    ) -> Result<usize> {
        self.get_all_into(hand_id, Command::GetFingerPosAll, target, current)
    }

    /// Read angles into caller buffers; returns the motor count.
    pub fn get_finger_angle_all_into(
        &mut self,
        hand_id: u8,
        target: &mut [i16],
        current: &mut [i16],
    ) -> Result<usize> {
        self.get_all_into(hand_id, Command::GetFingerAngleAll, target, current)
    }

    /// Move every listed motor to a raw encoder position.
    pub fn set_finger_pos_abs_all(
        &mut self,
        hand_id: u8,
        raw_pos: &[u16],
        speed: &[u8],
    ) -> Result<()> {
        let payload = encode_all(raw_pos, speed)?;
        self.execute(hand_id, Command::SetFingerPosAbsAll, &payload)
    }

    /// Move every listed motor to a logical position.
    pub fn set_finger_pos_all(&mut self, hand_id: u8, pos: &[u16], speed: &[u8]) -> Result<()> {
        self.execute(hand_id, Command::SetFingerPosAll, &encode_all(pos, speed)?)
    }

    /// Move every listed motor to an angle in centidegrees.
    pub fn set_finger_angle_all(
        &mut self,
        hand_id: u8,
        angle: &[i16],
        speed: &[u8],
    ) -> Result<()> {
        let payload = encode_all(angle, speed)?;
        self.execute(hand_id, Command::SetFingerAngleAll, &payload)
    }

    fn get_all<T: WireValue>(&mut self, hand_id: u8, command: Command) -> Result<MotorValues<T>> {
        let payload = self.request(hand_id, command, &[], MAX_PROTOCOL_DATA_SIZE)?;
        MotorValues::decode(&payload, MAX_MOTOR_CNT)
    }

    fn get_all_into<T: WireValue>(
        &mut self,
        hand_id: u8,
        command: Command,
        target: &mut [T],
        current: &mut [T],
    ) -> Result<usize> {
        let payload = self.request(hand_id, command, &[], MAX_PROTOCOL_DATA_SIZE)?;
        decode_all_into(&payload, target, current)
    }
}

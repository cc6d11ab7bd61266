//! Per-finger commands.
//!
//! Fingers are addressed by 0-based motor index. Every get response starts
//! with the finger id it describes; a mismatch is `DataInvalid`.

use crate::client::OHand;
use crate::codec::{PayloadWriter, WireValue};
use crate::error::Result;
use crate::protocol::Command;
use crate::types::{
    finger_payload, FingerValue, Pid, PosLimit, StopParams, ThumbRootPos, MAX_FORCE_ENTRIES,
};

/// Response size of finger id + four f32 gains.
const PID_RESPONSE_SIZE: usize = 1 + 4 * 4;

/// Response size of finger id + one u16.
const WORD_RESPONSE_SIZE: usize = 1 + 2;

/// Response size of finger id + two u16.
const PAIR_RESPONSE_SIZE: usize = 1 + 2 * 2;

/// Response size of finger id + four u16 stop parameters.
const STOP_PARAMS_RESPONSE_SIZE: usize = 1 + 2 * 4;

impl OHand {
    /// Read the position loop PID gains of a finger.
    pub fn get_finger_pid(&mut self, hand_id: u8, finger_id: u8) -> Result<Pid> {
        self.get_pid(hand_id, Command::GetFingerPid, finger_id)
    }

    /// Read the force loop PID gains of a finger.
    pub fn get_finger_force_pid(&mut self, hand_id: u8, finger_id: u8) -> Result<Pid> {
        self.get_pid(hand_id, Command::GetFingerForcePid, finger_id)
    }

    /// Read the current limit of a finger.
    pub fn get_finger_current_limit(&mut self, hand_id: u8, finger_id: u8) -> Result<u16> {
        self.get_word(hand_id, Command::GetFingerCurrentLimit, finger_id)
    }

    /// Read the motor current of a finger.
    pub fn get_finger_current(&mut self, hand_id: u8, finger_id: u8) -> Result<u16> {
        self.get_word(hand_id, Command::GetFingerCurrent, finger_id)
    }

    /// Read the force target of a finger.
    pub fn get_finger_force_target(&mut self, hand_id: u8, finger_id: u8) -> Result<u16> {
        self.get_word(hand_id, Command::GetFingerForceTarget, finger_id)
    }

    /// Read the force sensor entries of a finger.
    pub fn get_finger_force(&mut self, hand_id: u8, finger_id: u8) -> Result<Vec<u8>> {
        let payload = self.request(
            hand_id,
            Command::GetFingerForce,
            &[finger_id],
            2 + MAX_FORCE_ENTRIES,
        )?;
        let mut r = finger_payload(&payload, finger_id)?;
        let count = usize::from(r.u8()?);
        Ok(r.bytes(count)?.to_vec())
    }

    /// Read the position limits of a finger.
    pub fn get_finger_pos_limit(&mut self, hand_id: u8, finger_id: u8) -> Result<PosLimit> {
        let payload = self.request(
            hand_id,
            Command::GetFingerPosLimit,
            &[finger_id],
            PAIR_RESPONSE_SIZE,
        )?;
        let mut r = finger_payload(&payload, finger_id)?;
        Ok(PosLimit {
            low: r.u16()?,
            high: r.u16()?,
        })
    }

    /// Read target and current raw encoder position of a finger.
    pub fn get_finger_pos_abs(&mut self, hand_id: u8, finger_id: u8) -> Result<FingerValue<u16>> {
        self.get_pair(hand_id, Command::GetFingerPosAbs, finger_id)
    }

    /// Read target and current logical position of a finger.
    pub fn get_finger_pos(&mut self, hand_id: u8, finger_id: u8) -> Result<FingerValue<u16>> {
        self.get_pair(hand_id, Command::GetFingerPos, finger_id)
    }

    /// Read target and current angle of a finger, in centidegrees.
    pub fn get_finger_angle(&mut self, hand_id: u8, finger_id: u8) -> Result<FingerValue<i16>> {
        self.get_pair(hand_id, Command::GetFingerAngle, finger_id)
    }

    /// Read the stall detection parameters of a finger.
    pub fn get_finger_stop_params(&mut self, hand_id: u8, finger_id: u8) -> Result<StopParams> {
        let payload = self.request(
            hand_id,
            Command::GetFingerStopParams,
            &[finger_id],
            STOP_PARAMS_RESPONSE_SIZE,
        )?;
        StopParams::read(&mut finger_payload(&payload, finger_id)?)
    }

    /// Read the thumb root position.
    pub fn get_thumb_root_pos(&mut self, hand_id: u8) -> Result<ThumbRootPos> {
        let payload = self.request(hand_id, Command::GetThumbRootPos, &[], 3)?;
        ThumbRootPos::decode(&payload)
    }

    /// Set the position loop PID gains of a finger.
    pub fn set_finger_pid(&mut self, hand_id: u8, finger_id: u8, pid: Pid) -> Result<()> {
        self.set_pid(hand_id, Command::SetFingerPid, finger_id, pid)
    }

    /// Set the force loop PID gains of a finger.
    pub fn set_finger_force_pid(&mut self, hand_id: u8, finger_id: u8, pid: Pid) -> Result<()> {
        self.set_pid(hand_id, Command::SetFingerForcePid, finger_id, pid)
    }

    /// Set the current limit of a finger.
    pub fn set_finger_current_limit(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        limit: u16,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_u16(limit);
        self.execute(hand_id, Command::SetFingerCurrentLimit, &w.finish())
    }

    /// Set the force target of a finger.
    pub fn set_finger_force_target(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        target: u16,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_u16(target);
        self.execute(hand_id, Command::SetFingerForceTarget, &w.finish())
    }

    /// Set the position limits of a finger.
    pub fn set_finger_pos_limit(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        limit: PosLimit,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_u16(limit.low).put_u16(limit.high);
        self.execute(hand_id, Command::SetFingerPosLimit, &w.finish())
    }

    /// Start the fingers selected by `finger_bits` (bit n = finger n).
    pub fn finger_start(&mut self, hand_id: u8, finger_bits: u8) -> Result<()> {
        self.execute(hand_id, Command::FingerStart, &[finger_bits])
    }

    /// Stop the fingers selected by `finger_bits` (bit n = finger n).
    pub fn finger_stop(&mut self, hand_id: u8, finger_bits: u8) -> Result<()> {
        self.execute(hand_id, Command::FingerStop, &[finger_bits])
    }

    /// Move a finger to a raw encoder position.
    pub fn set_finger_pos_abs(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        raw_pos: u16,
        speed: u8,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_u16(raw_pos).put_u8(speed);
        self.execute(hand_id, Command::SetFingerPosAbs, &w.finish())
    }

    /// Move a finger to a logical position.
    pub fn set_finger_pos(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        pos: u16,
        speed: u8,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_u16(pos).put_u8(speed);
        self.execute(hand_id, Command::SetFingerPos, &w.finish())
    }

    /// Move a finger to an angle in centidegrees.
    pub fn set_finger_angle(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        angle: i16,
        speed: u8,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id).put_i16(angle).put_u8(speed);
        self.execute(hand_id, Command::SetFingerAngle, &w.finish())
    }

    /// Move the thumb root to position 0, 1 or 2.
    pub fn set_thumb_root_pos(&mut self, hand_id: u8, pos: u8, speed: u8) -> Result<()> {
        self.execute(hand_id, Command::SetThumbRootPos, &[pos, speed])
    }

    /// Set the stall detection parameters of a finger.
    pub fn set_finger_stop_params(
        &mut self,
        hand_id: u8,
        finger_id: u8,
        params: StopParams,
    ) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id);
        params.write(&mut w);
        self.execute(hand_id, Command::SetFingerStopParams, &w.finish())
    }

    /// Zero the force sensors.
    pub fn reset_force(&mut self, hand_id: u8) -> Result<()> {
        self.execute(hand_id, Command::ResetForce, &[])
    }

    fn get_pid(&mut self, hand_id: u8, command: Command, finger_id: u8) -> Result<Pid> {
        let payload = self.request(hand_id, command, &[finger_id], PID_RESPONSE_SIZE)?;
        Pid::read(&mut finger_payload(&payload, finger_id)?)
    }

    fn set_pid(&mut self, hand_id: u8, command: Command, finger_id: u8, pid: Pid) -> Result<()> {
        let mut w = PayloadWriter::new();
        w.put_u8(finger_id);
        pid.write(&mut w);
        self.execute(hand_id, command, &w.finish())
    }

    fn get_word(&mut self, hand_id: u8, command: Command, finger_id: u8) -> Result<u16> {
        let payload = self.request(hand_id, command, &[finger_id], WORD_RESPONSE_SIZE)?;
        finger_payload(&payload, finger_id)?.u16()
    }

    fn get_pair<T: WireValue>(
        &mut self,
        hand_id: u8,
        command: Command,
        finger_id: u8,
    ) -> Result<FingerValue<T>> {
        let payload = self.request(hand_id, command, &[finger_id], PAIR_RESPONSE_SIZE)?;
        FingerValue::read(&mut finger_payload(&payload, finger_id)?)
    }
}

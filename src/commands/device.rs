//! Device-level commands: versions, identity, counters and housekeeping.

use crate::client::OHand;
use crate::codec::{motors::MAX_MOTOR_CNT, PayloadReader, PayloadWriter};
use crate::error::{HandError, Result};
use crate::protocol::Command;
use crate::types::{
    FirmwareVersion, HardwareVersion, ManufactureData, ProtocolVersion, SelfTestLevel, Uid,
    UsageStat,
};

/// Size of a manufacture data record without the write key.
const MANUFACTURE_DATA_SIZE: usize = 26;

impl OHand {
    /// Read the protocol version.
    pub fn get_protocol_version(&mut self, hand_id: u8) -> Result<ProtocolVersion> {
        let payload = self.request(hand_id, Command::GetProtocolVersion, &[], 2)?;
        ProtocolVersion::decode(&payload)
    }

    /// Read the firmware version.
    pub fn get_firmware_version(&mut self, hand_id: u8) -> Result<FirmwareVersion> {
        let payload = self.request(hand_id, Command::GetFirmwareVersion, &[], 4)?;
        FirmwareVersion::decode(&payload)
    }

    /// Read the hardware and bootloader version.
    pub fn get_hardware_version(&mut self, hand_id: u8) -> Result<HardwareVersion> {
        let payload = self.request(hand_id, Command::GetHardwareVersion, &[], 4)?;
        HardwareVersion::decode(&payload)
    }

    /// Read the power-on self test level.
    pub fn get_self_test_level(&mut self, hand_id: u8) -> Result<SelfTestLevel> {
        let payload = self.request(hand_id, Command::GetSelfTestLevel, &[], 1)?;
        SelfTestLevel::try_from(PayloadReader::new(&payload).u8()?)
    }

    /// Check if the beeper is enabled.
    pub fn get_beep_switch(&mut self, hand_id: u8) -> Result<bool> {
        let payload = self.request(hand_id, Command::GetBeepSwitch, &[], 1)?;
        Ok(PayloadReader::new(&payload).u8()? != 0)
    }

    /// Read the button press counter.
    pub fn get_button_pressed_cnt(&mut self, hand_id: u8) -> Result<u8> {
        let payload = self.request(hand_id, Command::GetButtonPressedCnt, &[], 1)?;
        PayloadReader::new(&payload).u8()
    }

    /// Read the 96-bit unique id.
    pub fn get_uid(&mut self, hand_id: u8) -> Result<Uid> {
        let payload = self.request(hand_id, Command::GetUid, &[], 12)?;
        Uid::decode(&payload)
    }

    /// Read the supply voltage in millivolts.
    pub fn get_battery_voltage(&mut self, hand_id: u8) -> Result<u16> {
        let payload = self.request(hand_id, Command::GetBatteryVoltage, &[], 2)?;
        PayloadReader::new(&payload).u16()
    }

    /// Read usage counters for the first `motor_cnt` motors.
    pub fn get_usage_stat(&mut self, hand_id: u8, motor_cnt: u8) -> Result<UsageStat> {
        if usize::from(motor_cnt) > MAX_MOTOR_CNT {
            return Err(HandError::invalid(format!(
                "{} motors exceed maximum {}",
                motor_cnt, MAX_MOTOR_CNT
            )));
        }
        let payload = self.request(
            hand_id,
            Command::GetUsageStat,
            &[motor_cnt],
            4 + 4 * MAX_MOTOR_CNT,
        )?;
        UsageStat::decode(&payload, usize::from(motor_cnt))
    }

    /// Read the factory data record.
    pub fn get_manufacture_data(&mut self, hand_id: u8) -> Result<ManufactureData> {
        let payload = self.request(
            hand_id,
            Command::GetManufactureData,
            &[],
            MANUFACTURE_DATA_SIZE,
        )?;
        ManufactureData::decode(&payload)
    }

    /// Reset the hand; `mode` selects the reset kind.
    pub fn reset(&mut self, hand_id: u8, mode: u8) -> Result<()> {
        self.execute(hand_id, Command::Reset, &[mode])
    }

    /// Power the hand off.
    pub fn power_off(&mut self, hand_id: u8) -> Result<()> {
        self.execute(hand_id, Command::PowerOff, &[])
    }

    /// Change the hand's bus address.
    pub fn set_node_id(&mut self, hand_id: u8, new_id: u8) -> Result<()> {
        self.execute(hand_id, Command::SetNodeId, &[new_id])
    }

    /// Set the power-on self test level.
    pub fn set_self_test_level(&mut self, hand_id: u8, level: SelfTestLevel) -> Result<()> {
        self.execute(hand_id, Command::SetSelfTestLevel, &[level as u8])
    }

    /// Enable or disable the beeper.
    pub fn set_beep_switch(&mut self, hand_id: u8, on: bool) -> Result<()> {
        self.execute(hand_id, Command::SetBeepSwitch, &[u8::from(on)])
    }

    /// Beep for `duration_ms`.
    pub fn beep(&mut self, hand_id: u8, duration_ms: u16) -> Result<()> {
        self.execute(hand_id, Command::Beep, &duration_ms.to_le_bytes())
    }

    /// Overwrite the button press counter.
    pub fn set_button_pressed_cnt(&mut self, hand_id: u8, count: u8) -> Result<()> {
        self.execute(hand_id, Command::SetButtonPressedCnt, &[count])
    }

    /// Start initialization when the self test level is `Wait`.
    pub fn start_init(&mut self, hand_id: u8) -> Result<()> {
        self.execute(hand_id, Command::StartInit, &[])
    }

    /// Write the factory data record, guarded by `key`.
    pub fn set_manufacture_data(
        &mut self,
        hand_id: u8,
        key: [u8; 2],
        data: &ManufactureData,
    ) -> Result<()> {
        let mut writer = PayloadWriter::new();
        writer.put_slice(&key);
        data.write(&mut writer);
        self.execute(hand_id, Command::SetManufactureData, &writer.finish())
    }
}

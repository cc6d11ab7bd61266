//! Command identifiers.
//!
//! The low seven bits of the command byte select the operation. Codes
//! `0x00..=0x3E` read state from the hand, `0x40..=0x65` change it.

use std::fmt;

use crate::error::HandError;

/// Every command understood by the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Protocol version.
    GetProtocolVersion = 0x00,
    /// Firmware version.
    GetFirmwareVersion = 0x01,
    /// Hardware and bootloader version.
    GetHardwareVersion = 0x02,
    /// Calibration data.
    GetCaliData = 0x03,
    /// Position PID gains of one finger.
    GetFingerPid = 0x04,
    /// Current limit of one finger.
    GetFingerCurrentLimit = 0x05,
    /// Measured current of one finger.
    GetFingerCurrent = 0x06,
    /// Force target of one finger.
    GetFingerForceTarget = 0x07,
    /// Force sensor readings of one finger.
    GetFingerForce = 0x08,
    /// Position range of one finger.
    GetFingerPosLimit = 0x09,
    /// Raw encoder position of one finger.
    GetFingerPosAbs = 0x0A,
    /// Logical position of one finger.
    GetFingerPos = 0x0B,
    /// Angle of one finger.
    GetFingerAngle = 0x0C,
    /// Thumb root position.
    GetThumbRootPos = 0x0D,
    /// Raw encoder positions of every motor.
    GetFingerPosAbsAll = 0x0E,
    /// Logical positions of every motor.
    GetFingerPosAll = 0x0F,
    /// Angles of every motor.
    GetFingerAngleAll = 0x10,
    /// Stall parameters of one finger.
    GetFingerStopParams = 0x11,
    /// Force PID gains of one finger.
    GetFingerForcePid = 0x12,
    /// Power-on self-test level.
    GetSelfTestLevel = 0x20,
    /// Whether the buzzer is enabled.
    GetBeepSwitch = 0x21,
    /// Button press counter.
    GetButtonPressedCnt = 0x22,
    /// 96-bit unique id.
    GetUid = 0x23,
    /// Battery voltage in mV.
    GetBatteryVoltage = 0x24,
    /// Usage counters.
    GetUsageStat = 0x25,
    /// Factory data.
    GetManufactureData = 0x3E,

    /// Reboot, optionally into the bootloader.
    Reset = 0x40,
    /// Power the hand down.
    PowerOff = 0x41,
    /// Change the node address.
    SetNodeId = 0x42,
    /// Start calibration.
    Calibrate = 0x43,
    /// Write calibration data.
    SetCaliData = 0x44,
    /// Write position PID gains.
    SetFingerPid = 0x45,
    /// Write a current limit.
    SetFingerCurrentLimit = 0x46,
    /// Write a force target.
    SetFingerForceTarget = 0x47,
    /// Write a position range.
    SetFingerPosLimit = 0x48,
    /// Start the selected fingers.
    FingerStart = 0x49,
    /// Stop the selected fingers.
    FingerStop = 0x4A,
    /// Move one finger to a raw encoder position.
    SetFingerPosAbs = 0x4B,
    /// Move one finger to a logical position.
    SetFingerPos = 0x4C,
    /// Move one finger to an angle.
    SetFingerAngle = 0x4D,
    /// Move the thumb root to an indexed position.
    SetThumbRootPos = 0x4E,
    /// Move every listed motor to a raw encoder position.
    SetFingerPosAbsAll = 0x4F,
    /// Move every listed motor to a logical position.
    SetFingerPosAll = 0x50,
    /// Move every listed motor to an angle.
    SetFingerAngleAll = 0x51,
    /// Write stall parameters.
    SetFingerStopParams = 0x52,
    /// Write force PID gains.
    SetFingerForcePid = 0x53,
    /// Zero the force sensors.
    ResetForce = 0x54,
    /// Batched set and get across all motors.
    SetCustom = 0x5F,
    /// Write the self-test level.
    SetSelfTestLevel = 0x60,
    /// Enable or disable the buzzer.
    SetBeepSwitch = 0x61,
    /// Sound the buzzer.
    Beep = 0x62,
    /// Write the button press counter.
    SetButtonPressedCnt = 0x63,
    /// Start initialization.
    StartInit = 0x64,
    /// Write factory data.
    SetManufactureData = 0x65,
}

impl Command {
    /// Wire code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Check if this command only reads state.
    #[inline]
    pub fn is_get(self) -> bool {
        self.code() < 0x40
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.code()
    }
}

impl TryFrom<u8> for Command {
    type Error = HandError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        use Command::*;

        Ok(match code {
            0x00 => GetProtocolVersion,
            0x01 => GetFirmwareVersion,
            0x02 => GetHardwareVersion,
            0x03 => GetCaliData,
            0x04 => GetFingerPid,
            0x05 => GetFingerCurrentLimit,
            0x06 => GetFingerCurrent,
            0x07 => GetFingerForceTarget,
            0x08 => GetFingerForce,
            0x09 => GetFingerPosLimit,
            0x0A => GetFingerPosAbs,
            0x0B => GetFingerPos,
            0x0C => GetFingerAngle,
            0x0D => GetThumbRootPos,
            0x0E => GetFingerPosAbsAll,
            0x0F => GetFingerPosAll,
            0x10 => GetFingerAngleAll,
            0x11 => GetFingerStopParams,
            0x12 => GetFingerForcePid,
            0x20 => GetSelfTestLevel,
            0x21 => GetBeepSwitch,
            0x22 => GetButtonPressedCnt,
            0x23 => GetUid,
            0x24 => GetBatteryVoltage,
            0x25 => GetUsageStat,
            0x3E => GetManufactureData,
            0x40 => Reset,
            0x41 => PowerOff,
            0x42 => SetNodeId,
            0x43 => Calibrate,
            0x44 => SetCaliData,
            0x45 => SetFingerPid,
            0x46 => SetFingerCurrentLimit,
            0x47 => SetFingerForceTarget,
            0x48 => SetFingerPosLimit,
            0x49 => FingerStart,
            0x4A => FingerStop,
            0x4B => SetFingerPosAbs,
            0x4C => SetFingerPos,
            0x4D => SetFingerAngle,
            0x4E => SetThumbRootPos,
            0x4F => SetFingerPosAbsAll,
            0x50 => SetFingerPosAll,
            0x51 => SetFingerAngleAll,
            0x52 => SetFingerStopParams,
            0x53 => SetFingerForcePid,
            0x54 => ResetForce,
            0x5F => SetCustom,
            0x60 => SetSelfTestLevel,
            0x61 => SetBeepSwitch,
            0x62 => Beep,
            0x63 => SetButtonPressedCnt,
            0x64 => StartInit,
            0x65 => SetManufactureData,
            other => return Err(HandError::invalid(format!("unknown command {:#04x}", other))),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:#04x})", self, self.code())
    }
}

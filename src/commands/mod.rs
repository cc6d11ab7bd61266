//! Hand commands.
//!
//! Each submodule adds one family of operations to [`OHand`](crate::OHand):
//!
//! - `device` - versions, identity, counters, power and housekeeping
//! - `finger` - per-finger gets and sets
//! - `all` - every motor in one exchange
//! - `calibration` - calibration data and the calibrate command
//! - `custom` - the batched custom command
//!
//! Per-finger gets check that the response echoes the requested finger id.
//! Sets ignore any payload the hand returns with its acknowledgement.

mod all;
mod calibration;
mod custom;
mod device;
mod finger;

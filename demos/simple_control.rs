//! Simple control - open a serial port and move a hand.
//!
//! This example demonstrates:
//! - Locating the USB-serial adapter with `find_port`
//! - Building an `OHand` client on a `SerialTransport`
//! - Reading version information
//! - Moving one finger, then all fingers at once
//!
//! # Running
//!
//! ```text
//! RUST_LOG=ohand_client=debug cargo run --example simple_control -- /dev/ttyUSB0
//! ```

use std::thread;
use std::time::Duration;

use ohand_client::config::SerialConfig;
use ohand_client::transport::{find_port, SerialTransport};
use ohand_client::OHand;
use tracing_subscriber::EnvFilter;

/// Default node address of a hand fresh from the factory.
const HAND_ID: u8 = 0x02;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Explicit port first, otherwise the first CH340 adapter found
    let port = std::env::args()
        .nth(1)
        .or_else(|| find_port("CH340"))
        .ok_or("no serial port given and none found")?;

    let transport = SerialTransport::open(&SerialConfig::new(port))?;
    let mut hand = OHand::builder().transport(transport).build()?;

    let protocol = hand.get_protocol_version(HAND_ID)?;
    let firmware = hand.get_firmware_version(HAND_ID)?;
    let hardware = hand.get_hardware_version(HAND_ID)?;
    println!("protocol {}, firmware {}", protocol, firmware);
    println!("hardware {:?}", hardware);

    // Close the index finger, then open it again
    hand.set_finger_pos(HAND_ID, 1, 65535, 255)?;
    thread::sleep(Duration::from_secs(1));
    hand.set_finger_pos(HAND_ID, 1, 0, 255)?;
    thread::sleep(Duration::from_secs(1));

    // Half-close every finger
    hand.set_finger_pos_all(HAND_ID, &[32768; 5], &[200; 5])?;
    thread::sleep(Duration::from_secs(1));

    let positions = hand.get_finger_pos_all(HAND_ID)?;
    println!("targets  {:?}", positions.target);
    println!("currents {:?}", positions.current);

    Ok(())
}

//! UART transport over the `serialport` crate.
//!
//! # Example
//!
//! ```ignore
//! use ohand_client::config::SerialConfig;
//! use ohand_client::transport::{find_port, SerialTransport};
//!
//! let port = find_port("CH340").unwrap_or_else(|| "/dev/ttyUSB0".to_string());
//! let transport = SerialTransport::open(&SerialConfig::new(port))?;
//! ```

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, SerialPortType, StopBits};

use super::Transport;
use crate::config::SerialConfig;

/// Serial port carrying the hand protocol (8N1).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the port described by `config`.
    pub fn open(config: &SerialConfig) -> io::Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()?;

        tracing::info!(
            "Serial port {} opened at {} baud",
            config.port,
            config.baud_rate
        );
        Ok(Self { port })
    }

    /// Wrap an already opened port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Get a reference to the underlying port.
    pub fn inner(&self) -> &dyn SerialPort {
        self.port.as_ref()
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, _addr: u8, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }

    fn poll(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }
}

/// Find the first serial port whose USB description or name contains `pattern`.
pub fn find_port(pattern: &str) -> Option<String> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            tracing::warn!("Port enumeration failed: {}", e);
            return None;
        }
    };

    ports
        .into_iter()
        .find(|p| {
            let described = match &p.port_type {
                SerialPortType::UsbPort(info) => info
                    .product
                    .as_deref()
                    .is_some_and(|product| product.contains(pattern)),
                _ => false,
            };
            described || p.port_name.contains(pattern)
        })
        .map(|p| p.port_name)
}

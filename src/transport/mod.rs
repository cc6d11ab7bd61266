//! Transport module - byte movement between master and hands.
//!
//! Provides:
//! - [`Transport`], the seam the transactor drives
//! - [`MemoryTransport`], a scripted in-process bus for tests and simulation
//! - `SerialTransport` (feature `serial`), a UART adapter

mod memory;
#[cfg(feature = "serial")]
mod serial;

pub use memory::{MemoryTransport, Responder};
#[cfg(feature = "serial")]
pub use serial::{find_port, SerialTransport};

use std::io;

/// Half-duplex byte transport.
///
/// `send` writes one complete encoded frame. `poll` copies whatever bytes
/// are currently available into `buf` and returns how many were written;
/// it must not block for longer than a few milliseconds and returns `Ok(0)`
/// when nothing arrived.
pub trait Transport {
    /// Send an encoded frame to the node at `addr`.
    ///
    /// `addr` is informational for byte-stream links; link layers with their
    /// own addressing (e.g. CAN identifiers) may use it.
    fn send(&mut self, addr: u8, frame: &[u8]) -> io::Result<()>;

    /// Copy currently available bytes into `buf`.
    fn poll(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, addr: u8, frame: &[u8]) -> io::Result<()> {
        (**self).send(addr, frame)
    }

    fn poll(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).poll(buf)
    }
}

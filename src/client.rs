//! Client builder and hand facade.
//!
//! The [`OHandBuilder`] provides a fluent API for wiring a transport, a clock
//! and protocol settings. The resulting [`OHand`] exposes one method per
//! hand command (see the `commands` module); each call is one complete
//! request/response exchange.
//!
//! # Example
//!
//! ```
//! use ohand_client::protocol::encode_frame;
//! use ohand_client::transport::MemoryTransport;
//! use ohand_client::OHand;
//!
//! let mut bus = MemoryTransport::new();
//! bus.set_responder(|req| {
//!     Some(encode_frame(req.src, req.dest, req.command, &[0xE4, 0x0C]).unwrap().to_vec())
//! });
//!
//! let mut hand = OHand::builder()
//!     .transport(bus)
//!     .command_timeout_ms(100)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(hand.get_battery_voltage(0x02).unwrap(), 3300);
//! ```

use bytes::Bytes;

use crate::clock::{Clock, SystemClock};
use crate::config::ProtocolConfig;
use crate::error::{HandError, Result};
use crate::protocol::{Command, MAX_PROTOCOL_DATA_SIZE};
use crate::transactor::Transactor;
use crate::transport::Transport;

/// Builder for configuring and creating an [`OHand`].
///
/// A transport is mandatory. Without an explicit clock the wall clock is used.
#[derive(Default)]
pub struct OHandBuilder {
    transport: Option<Box<dyn Transport + Send>>,
    clock: Option<Box<dyn Clock + Send>>,
    config: ProtocolConfig,
}

impl OHandBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte transport.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + Send + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Set the time source.
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Replace all protocol settings.
    pub fn config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set our own bus address.
    ///
    /// Default: 0x01
    pub fn master_address(mut self, address: u8) -> Self {
        self.config.master_address = address;
        self
    }

    /// Set the response timeout applied to every command.
    ///
    /// Default: 255 ms
    pub fn command_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.command_timeout_ms = timeout_ms;
        self
    }

    /// Set the sleep between transport polls.
    ///
    /// Default: 1 ms. Zero is raised to 1 ms.
    pub fn poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self
    }

    /// Build the client.
    ///
    /// Fails with `InvalidContext` when no transport was set.
    pub fn build(self) -> Result<OHand> {
        let transport = self.transport.ok_or(HandError::InvalidContext)?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()));

        tracing::debug!(
            "OHand client ready: master {:#04x}, timeout {} ms",
            self.config.master_address,
            self.config.command_timeout_ms
        );

        Ok(OHand {
            transactor: Transactor::with_config(transport, Some(clock), &self.config),
        })
    }
}

/// Master-side handle to every hand on one bus.
///
/// Each command method takes the target hand's address first. Methods take
/// `&mut self`, so at most one exchange is ever outstanding.
pub struct OHand {
    transactor: Transactor,
}

impl OHand {
    /// Create a builder.
    pub fn builder() -> OHandBuilder {
        OHandBuilder::new()
    }

    /// Wrap an already configured transactor.
    pub fn from_transactor(transactor: Transactor) -> Self {
        Self { transactor }
    }

    /// Our own bus address.
    #[inline]
    pub fn master_address(&self) -> u8 {
        self.transactor.master_address()
    }

    /// Response timeout applied to every command.
    #[inline]
    pub fn command_timeout(&self) -> u64 {
        self.transactor.command_timeout_ms()
    }

    /// Change the response timeout for all subsequent commands.
    pub fn set_command_timeout(&mut self, timeout_ms: u64) {
        self.transactor.set_command_timeout_ms(timeout_ms);
    }

    /// Get a reference to the underlying transactor.
    #[inline]
    pub fn transactor(&self) -> &Transactor {
        &self.transactor
    }

    /// Get a mutable reference to the underlying transactor.
    #[inline]
    pub fn transactor_mut(&mut self) -> &mut Transactor {
        &mut self.transactor
    }

    /// One exchange returning the response payload.
    pub(crate) fn request(
        &mut self,
        hand_id: u8,
        command: Command,
        payload: &[u8],
        capacity: usize,
    ) -> Result<Bytes> {
        self.transactor
            .transact(hand_id, command.code(), payload, capacity)
    }

    /// One exchange whose response payload is ignored.
    pub(crate) fn execute(&mut self, hand_id: u8, command: Command, payload: &[u8]) -> Result<()> {
        self.request(hand_id, command, payload, MAX_PROTOCOL_DATA_SIZE)
            .map(|_| ())
    }
}

//! Request/response transactor.
//!
//! The [`Transactor`] owns the transport, the clock and the connection's
//! single [`FrameDecoder`]. It provides the two primitives every command is
//! built from:
//! 1. [`Transactor::send`] encodes and writes one request frame
//! 2. [`Transactor::await_response`] polls the transport until a frame for us
//!    is ready, then validates checksum, source and command
//!
//! Exactly one `send`/`await_response` pair may be in flight; `&mut self`
//! enforces this for callers sharing one transactor.
//!
//! # Suspension point
//!
//! The wait loop sleeps `poll_interval_ms` through the [`Clock`], polls the
//! transport once and re-checks the deadline. The decoder only advances
//! inside this loop. An event-driven driver can replace the sleep + poll pair
//! with "await byte arrival, then feed [`Transactor::on_data`]" and keep the
//! same deadline and ordering semantics.
//!
//! # Example
//!
//! ```
//! use ohand_client::protocol::encode_frame;
//! use ohand_client::transport::MemoryTransport;
//! use ohand_client::{SystemClock, Transactor};
//!
//! let mut bus = MemoryTransport::new();
//! bus.set_responder(|req| {
//!     Some(encode_frame(req.src, req.dest, req.command, &[0x02, 0x01]).unwrap().to_vec())
//! });
//!
//! let mut transactor = Transactor::new(bus, 0x01);
//! transactor.set_clock(SystemClock::new());
//!
//! let payload = transactor.transact(0x02, 0x00, &[], 2).unwrap();
//! assert_eq!(&payload[..], &[0x02, 0x01]);
//! ```

use bytes::Bytes;

use crate::clock::Clock;
use crate::config::{ProtocolConfig, DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS};
use crate::error::{HandError, RemoteFault, Result};
use crate::protocol::{
    encode_frame, DecoderPhase, Frame, FrameDecoder, BROADCAST_ADDRESS, CMD_ERROR_MASK,
    MAX_PROTOCOL_DATA_SIZE,
};
use crate::transport::Transport;

/// Bytes requested from the transport per poll.
const POLL_CHUNK_SIZE: usize = 64;

/// Shortest sleep between polls; a zero sleep would never reach the deadline
/// on a virtual clock.
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Offset of the device error code inside an error response payload.
const REMOTE_ERROR_OFFSET: usize = 1;

/// Expectations for one in-flight request.
#[derive(Debug, Clone, Copy)]
struct TransactionContext {
    /// Node the request was sent to (0xFF accepts any source).
    target: u8,
    /// Command the response must echo.
    command: u8,
    /// Clock tick after which the wait gives up.
    deadline: u64,
    /// Largest payload the caller accepts.
    capacity: usize,
}

impl TransactionContext {
    /// Validate a consumed frame and extract its payload.
    fn validate(&self, frame: Frame) -> Result<Bytes> {
        let expected = frame.compute_checksum();
        if expected != frame.checksum {
            tracing::warn!(
                "Checksum mismatch from {:#04x}: expected {:#04x}, got {:#04x}",
                frame.src,
                expected,
                frame.checksum
            );
            return Err(HandError::BadChecksum {
                expected,
                actual: frame.checksum,
            });
        }

        if frame.is_error() {
            let code = frame
                .payload
                .get(REMOTE_ERROR_OFFSET)
                .copied()
                .ok_or_else(|| HandError::invalid("error response without error code"))?;
            let fault = RemoteFault(code);
            tracing::debug!(
                "Hand {:#04x} reported {} for command {:#04x}",
                frame.src,
                fault,
                frame.command_id()
            );
            return Err(HandError::Remote(fault));
        }

        if frame.src != self.target && self.target != BROADCAST_ADDRESS {
            tracing::warn!(
                "Response from {:#04x} while waiting for {:#04x}",
                frame.src,
                self.target
            );
            return Err(HandError::UnmatchedAddress {
                expected: self.target,
                actual: frame.src,
            });
        }

        let command = frame.command_id();
        if command != self.command & !CMD_ERROR_MASK {
            tracing::warn!(
                "Response for command {:#04x} while waiting for {:#04x}",
                command,
                self.command
            );
            return Err(HandError::UnmatchedCommand {
                expected: self.command,
                actual: command,
            });
        }

        if frame.payload_len() > self.capacity {
            return Err(HandError::BufferTooSmall {
                len: frame.payload_len(),
                capacity: self.capacity,
            });
        }

        tracing::debug!(
            "Response {:#04x} from {:#04x}: {} bytes",
            command,
            frame.src,
            frame.payload_len()
        );
        Ok(frame.payload)
    }
}

/// Drives request/response exchanges over one transport.
pub struct Transactor {
    /// Byte transport to the bus.
    transport: Box<dyn Transport + Send>,
    /// Time source; required before any exchange.
    clock: Option<Box<dyn Clock + Send>>,
    /// The connection's decoder.
    decoder: FrameDecoder,
    /// Our own address (frame source, required response destination).
    master_address: u8,
    /// Timeout applied by [`Transactor::transact`].
    command_timeout_ms: u64,
    /// Sleep between polls while waiting.
    poll_interval_ms: u64,
    /// Scratch buffer for transport polls.
    rx_buf: [u8; POLL_CHUNK_SIZE],
}

impl Transactor {
    /// Create a transactor without a clock.
    ///
    /// Install one with [`Transactor::set_clock`] before sending; until then
    /// every exchange fails with `TimerNotConfigured`.
    pub fn new<T>(transport: T, master_address: u8) -> Self
    where
        T: Transport + Send + 'static,
    {
        Self {
            transport: Box::new(transport),
            clock: None,
            decoder: FrameDecoder::new(master_address),
            master_address,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            rx_buf: [0u8; POLL_CHUNK_SIZE],
        }
    }

    /// Create a transactor from a boxed transport and configuration.
    pub fn with_config(
        transport: Box<dyn Transport + Send>,
        clock: Option<Box<dyn Clock + Send>>,
        config: &ProtocolConfig,
    ) -> Self {
        Self {
            transport,
            clock,
            decoder: FrameDecoder::new(config.master_address),
            master_address: config.master_address,
            command_timeout_ms: config.command_timeout_ms,
            poll_interval_ms: config.poll_interval_ms.max(MIN_POLL_INTERVAL_MS),
            rx_buf: [0u8; POLL_CHUNK_SIZE],
        }
    }

    /// Install the time source.
    pub fn set_clock<C>(&mut self, clock: C)
    where
        C: Clock + Send + 'static,
    {
        self.clock = Some(Box::new(clock));
    }

    /// Check if a clock is installed.
    pub fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    /// Current tick, or 0 without a clock.
    pub fn tick(&self) -> u64 {
        self.clock.as_ref().map_or(0, |c| c.now_ms())
    }

    /// Our own bus address.
    #[inline]
    pub fn master_address(&self) -> u8 {
        self.master_address
    }

    /// Timeout used by [`Transactor::transact`].
    #[inline]
    pub fn command_timeout_ms(&self) -> u64 {
        self.command_timeout_ms
    }

    /// Change the timeout for all subsequent transactions.
    pub fn set_command_timeout_ms(&mut self, timeout_ms: u64) {
        self.command_timeout_ms = timeout_ms;
    }

    /// Sleep between transport polls.
    #[inline]
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    /// Change the sleep between transport polls, clamped to at least
    /// [`MIN_POLL_INTERVAL_MS`].
    pub fn set_poll_interval_ms(&mut self, interval_ms: u64) {
        self.poll_interval_ms = interval_ms.max(MIN_POLL_INTERVAL_MS);
    }

    /// Current decoder phase.
    #[inline]
    pub fn decoder_phase(&self) -> DecoderPhase {
        self.decoder.phase()
    }

    /// Read access to the decoder.
    #[inline]
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Feed one received byte into the decoder.
    #[inline]
    pub fn on_data(&mut self, byte: u8) {
        self.decoder.push_byte(byte);
    }

    /// Encode and send one request frame.
    pub fn send(&mut self, target: u8, command: u8, payload: &[u8]) -> Result<()> {
        if self.clock.is_none() {
            return Err(HandError::TimerNotConfigured);
        }

        let frame = encode_frame(target, self.master_address, command, payload)?;
        self.transport.send(target, &frame)?;

        tracing::debug!(
            "Sent command {:#04x} to {:#04x}: {} bytes payload",
            command,
            target,
            payload.len()
        );
        Ok(())
    }

    /// Wait for the response to a previously sent request.
    ///
    /// The ready frame is always consumed, whether it validates or not.
    pub fn await_response(
        &mut self,
        target: u8,
        command: u8,
        timeout_ms: u64,
        capacity: usize,
    ) -> Result<Bytes> {
        let clock = self.clock.as_ref().ok_or(HandError::TimerNotConfigured)?;

        let ctx = TransactionContext {
            target,
            command,
            deadline: clock.now_ms().saturating_add(timeout_ms),
            capacity,
        };

        while !self.decoder.is_ready() {
            clock.sleep_ms(self.poll_interval_ms);
            Self::poll_into(self.transport.as_mut(), &mut self.decoder, &mut self.rx_buf);

            if self.decoder.is_ready() {
                break;
            }
            if clock.now_ms() > ctx.deadline {
                tracing::debug!(
                    "Timeout after {} ms waiting for {:#04x} from {:#04x}",
                    timeout_ms,
                    command,
                    target
                );
                self.decoder.reset();
                return Err(HandError::Timeout);
            }
        }

        let frame = self
            .decoder
            .take_frame()
            .ok_or_else(|| HandError::invalid("decoder signalled a frame but held none"))?;
        ctx.validate(frame)
    }

    /// Send a request and wait for its response using the command timeout.
    pub fn transact(
        &mut self,
        target: u8,
        command: u8,
        payload: &[u8],
        capacity: usize,
    ) -> Result<Bytes> {
        self.send(target, command, payload)?;
        self.await_response(target, command, self.command_timeout_ms, capacity)
    }

    /// Like [`Transactor::transact`] for commands whose reply carries no data.
    pub fn transact_ack(&mut self, target: u8, command: u8, payload: &[u8]) -> Result<()> {
        self.transact(target, command, payload, MAX_PROTOCOL_DATA_SIZE)
            .map(|_| ())
    }

    /// Poll the transport once and feed every byte into the decoder.
    fn poll_into(
        transport: &mut (dyn Transport + Send),
        decoder: &mut FrameDecoder,
        buf: &mut [u8],
    ) {
        match transport.poll(buf) {
            Ok(0) => {}
            Ok(n) => {
                decoder.push(&buf[..n]);
            }
            Err(e) => {
                tracing::warn!("Transport poll failed: {}", e);
            }
        }
    }
}

//! In-memory transport.
//!
//! A cloneable, shared-state bus: the transactor owns one handle while a test
//! keeps another to inject bytes and inspect what was sent. An optional
//! responder plays the hand, answering each sent request frame.
//!
//! # Example
//!
//! ```
//! use ohand_client::protocol::encode_frame;
//! use ohand_client::transport::{MemoryTransport, Transport};
//!
//! let mut bus = MemoryTransport::new();
//! let wire = bus.clone();
//!
//! bus.set_responder(|req| {
//!     Some(encode_frame(req.src, req.dest, req.command, &[0x01, 0x02]).unwrap().to_vec())
//! });
//!
//! let frame = encode_frame(0x02, 0x01, 0x00, &[]).unwrap();
//! bus.send(0x02, &frame).unwrap();
//! assert_eq!(wire.sent_frames().len(), 1);
//! assert_eq!(wire.pending_rx(), 9);
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::Transport;
use crate::protocol::{Frame, FrameDecoder};

/// Callback answering a request frame with raw bytes to deliver.
pub type Responder = Box<dyn FnMut(&Frame) -> Option<Vec<u8>> + Send>;

#[derive(Default)]
struct State {
    /// Every frame handed to `send`, in order.
    sent: Vec<Bytes>,
    /// Bytes waiting to be polled.
    rx: VecDeque<u8>,
    /// Plays the remote side.
    responder: Option<Responder>,
    /// Upper bound on bytes returned by one poll (0 = unbounded).
    chunk_size: usize,
    /// Number of upcoming sends that fail.
    failing_sends: usize,
    /// Error returned by the next poll.
    poll_error: Option<io::ErrorKind>,
}

/// Shared in-memory transport.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that delivers at most `chunk_size` bytes per poll.
    ///
    /// A chunk size of 8 mimics CAN link frames.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let transport = Self::default();
        transport.lock().chunk_size = chunk_size;
        transport
    }

    /// Install a responder called for every successfully sent frame.
    ///
    /// The bus lock is released while the responder runs, so it may hold and
    /// use a clone of this transport.
    pub fn set_responder<F>(&mut self, responder: F)
    where
        F: FnMut(&Frame) -> Option<Vec<u8>> + Send + 'static,
    {
        self.lock().responder = Some(Box::new(responder));
    }

    /// Remove the responder.
    pub fn clear_responder(&mut self) {
        self.lock().responder = None;
    }

    /// Queue raw bytes for delivery.
    pub fn inject(&self, bytes: &[u8]) {
        self.lock().rx.extend(bytes);
    }

    /// Make the next `count` sends fail with `BrokenPipe`.
    pub fn fail_sends(&self, count: usize) {
        self.lock().failing_sends = count;
    }

    /// Make the next poll fail with `kind`.
    pub fn fail_next_poll(&self, kind: io::ErrorKind) {
        self.lock().poll_error = Some(kind);
    }

    /// Frames sent so far.
    pub fn sent_frames(&self) -> Vec<Bytes> {
        self.lock().sent.clone()
    }

    /// Most recently sent frame.
    pub fn last_sent(&self) -> Option<Bytes> {
        self.lock().sent.last().cloned()
    }

    /// Number of bytes waiting to be polled.
    pub fn pending_rx(&self) -> usize {
        self.lock().rx.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, addr: u8, frame: &[u8]) -> io::Result<()> {
        let mut state = self.lock();

        if state.failing_sends > 0 {
            state.failing_sends -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "send failed"));
        }

        state.sent.push(Bytes::copy_from_slice(frame));

        // Decode our own request the way the hand would.
        let mut decoder = FrameDecoder::new(addr);
        decoder.push(frame);
        let Some(request) = decoder.take_frame() else {
            return Ok(());
        };
        let Some(mut responder) = state.responder.take() else {
            return Ok(());
        };

        // The responder runs unlocked so it may use other handles to this bus.
        drop(state);
        let reply = responder(&request);

        let mut state = self.lock();
        if state.responder.is_none() {
            state.responder = Some(responder);
        }
        if let Some(reply) = reply {
            state.rx.extend(reply);
        }

        Ok(())
    }

    fn poll(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.lock();

        if let Some(kind) = state.poll_error.take() {
            return Err(io::Error::new(kind, "poll failed"));
        }

        let mut limit = buf.len().min(state.rx.len());
        if state.chunk_size > 0 {
            limit = limit.min(state.chunk_size);
        }

        for slot in buf.iter_mut().take(limit) {
            match state.rx.pop_front() {
                Some(byte) => *slot = byte,
                None => break,
            }
        }
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_frame;

    #[test]
    fn test_inject_and_poll() {
        let mut transport = MemoryTransport::new();
        transport.inject(&[1, 2, 3]);

        let mut buf = [0u8; 8];
        assert_eq!(transport.poll(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(transport.poll(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_chunked_poll() {
        let mut transport = MemoryTransport::with_chunk_size(8);
        transport.inject(&[0xAB; 20]);

        let mut buf = [0u8; 64];
        assert_eq!(transport.poll(&mut buf).unwrap(), 8);
        assert_eq!(transport.poll(&mut buf).unwrap(), 8);
        assert_eq!(transport.poll(&mut buf).unwrap(), 4);
    }

    #[test]
    fn test_responder_sees_request() {
        let mut transport = MemoryTransport::new();
        let wire = transport.clone();
        transport.set_responder(|req| {
            assert_eq!(req.dest, 0x02);
            assert_eq!(req.command, 0x24);
            Some(vec![0xEE])
        });

        let frame = encode_frame(0x02, 0x01, 0x24, &[]).unwrap();
        transport.send(0x02, &frame).unwrap();

        assert_eq!(wire.last_sent().unwrap(), frame);
        assert_eq!(wire.pending_rx(), 1);
    }

    #[test]
    fn test_send_failure() {
        let mut transport = MemoryTransport::new();
        transport.fail_sends(1);

        assert!(transport.send(0x02, &[0x55]).is_err());
        assert!(transport.send(0x02, &[0x55]).is_ok());
        assert_eq!(transport.sent_frames().len(), 1);
    }

    #[test]
    fn test_poll_failure_is_one_shot() {
        let mut transport = MemoryTransport::new();
        transport.fail_next_poll(io::ErrorKind::Other);

        let mut buf = [0u8; 4];
        assert!(transport.poll(&mut buf).is_err());
        assert!(transport.poll(&mut buf).is_ok());
    }

    #[test]
    fn test_responder_may_use_bus_handle() {
        let mut transport = MemoryTransport::new();
        let handle = transport.clone();
        transport.set_responder(move |req| {
            // Early byte delivered through the shared handle.
            handle.inject(&[0xA0]);
            Some(vec![req.command])
        });

        let frame = encode_frame(0x02, 0x01, 0x22, &[]).unwrap();
        transport.send(0x02, &frame).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(transport.poll(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[0xA0, 0x22]);

        // The responder is still installed for the next request.
        transport.send(0x02, &frame).unwrap();
        assert_eq!(transport.pending_rx(), 2);
    }
}

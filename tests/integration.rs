//! Integration tests for ohand-client.
//!
//! These tests drive complete exchanges through the in-memory transport, with
//! a simulated hand answering on the other side.

use std::sync::{Arc, Mutex};

use ohand_client::protocol::{encode_frame, DecoderPhase, Frame, CMD_ERROR_MASK};
use ohand_client::transport::MemoryTransport;
use ohand_client::{
    CustomRequest, ErrorCategory, HandError, ManualClock, OHand, RemoteFault, SubCommand,
};

const MASTER: u8 = 0x01;
const LEFT: u8 = 0x02;
const RIGHT: u8 = 0x03;

/// Simulated hand state: six logical finger positions.
#[derive(Default)]
struct SimHand {
    positions: [u16; 6],
}

impl SimHand {
    fn handle(&mut self, req: &Frame) -> Result<Vec<u8>, u8> {
        match req.command {
            // get_finger_pos_all
            0x0F => {
                let mut reply = Vec::new();
                for p in self.positions.iter().chain(self.positions.iter()) {
                    reply.extend_from_slice(&p.to_le_bytes());
                }
                Ok(reply)
            }
            // set_finger_pos
            0x4C => {
                let finger = usize::from(req.payload[0]);
                let pos = u16::from_le_bytes([req.payload[1], req.payload[2]]);
                *self
                    .positions
                    .get_mut(finger)
                    .ok_or(RemoteFault::INVALID_DATA.code())? = pos;
                Ok(vec![])
            }
            // set_custom: apply positions, answer with positions + status
            0x5F => {
                let mask = SubCommand::from_bits_truncate(req.payload[0]);
                let mut offset = 1;
                let width = mask.iter().filter(|f| SubCommand::SET_ALL.contains(*f)).count();
                let motors = (req.payload.len() - 1) / (2 * width.max(1));
                if mask.contains(SubCommand::SET_SPEED) {
                    offset += 2 * motors;
                }
                if mask.contains(SubCommand::SET_POS) {
                    for m in 0..motors {
                        let at = offset + 2 * m;
                        self.positions[m] =
                            u16::from_le_bytes([req.payload[at], req.payload[at + 1]]);
                    }
                }
                let mut reply = Vec::new();
                if mask.contains(SubCommand::GET_POS) {
                    for p in &self.positions[..motors] {
                        reply.extend_from_slice(&p.to_le_bytes());
                    }
                }
                if mask.contains(SubCommand::GET_STATUS) {
                    reply.extend((0..motors as u8).map(|m| m * 2));
                }
                Ok(reply)
            }
            // calibrate: not allowed in this state
            0x43 => Err(RemoteFault::STATUS_INIT.code()),
            _ => Err(RemoteFault::COMMAND_INVALID.code()),
        }
    }
}

/// A bus with two simulated hands, addressed `LEFT` and `RIGHT`.
fn two_hand_bus(chunk_size: usize) -> (OHand, MemoryTransport, Arc<Mutex<[SimHand; 2]>>) {
    let hands = Arc::new(Mutex::new([SimHand::default(), SimHand::default()]));
    let sims = Arc::clone(&hands);

    let mut bus = MemoryTransport::with_chunk_size(chunk_size);
    bus.set_responder(move |req| {
        let mut sims = sims.lock().unwrap();
        let sim = match req.dest {
            LEFT => &mut sims[0],
            RIGHT => &mut sims[1],
            _ => return None,
        };
        let frame = match sim.handle(req) {
            Ok(payload) => encode_frame(req.src, req.dest, req.command, &payload),
            Err(code) => encode_frame(
                req.src,
                req.dest,
                req.command | CMD_ERROR_MASK,
                &[req.command, code],
            ),
        };
        Some(frame.unwrap().to_vec())
    });
    let wire = bus.clone();

    let hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .master_address(MASTER)
        .command_timeout_ms(50)
        .build()
        .unwrap();
    (hand, wire, hands)
}

#[test]
fn test_set_then_get_positions() {
    let (mut hand, _, sims) = two_hand_bus(0);

    hand.set_finger_pos(LEFT, 1, 40_000, 255).unwrap();
    hand.set_finger_pos(RIGHT, 4, 12_345, 255).unwrap();

    let left = hand.get_finger_pos_all(LEFT).unwrap();
    assert_eq!(left.target, vec![0, 40_000, 0, 0, 0, 0]);

    let right = hand.get_finger_pos_all(RIGHT).unwrap();
    assert_eq!(right.current[4], 12_345);

    assert_eq!(sims.lock().unwrap()[0].positions[1], 40_000);
}

#[test]
fn test_custom_command_positions_and_status() {
    let (mut hand, wire, _) = two_hand_bus(0);

    let request = CustomRequest::new()
        .with_speed(vec![10, 20, 30])
        .with_position(vec![100, 200, 300])
        .get(SubCommand::GET_POS | SubCommand::GET_STATUS);
    let response = hand.set_custom(LEFT, &request).unwrap();

    let sent = wire.last_sent().unwrap();
    assert_eq!(sent[6], 0x8B);
    assert_eq!(&sent[7..13], &[10, 0, 20, 0, 30, 0]);
    assert_eq!(&sent[13..19], &[100, 0, 200, 0, 0x2C, 0x01]);

    assert_eq!(response.motor_count, 3);
    assert_eq!(response.position, Some(vec![100, 200, 300]));
    assert_eq!(response.status, Some(vec![0, 2, 4]));
    assert_eq!(response.angle, None);
}

#[test]
fn test_can_fragmentation() {
    let (mut hand, _, _) = two_hand_bus(8);

    hand.set_finger_pos(LEFT, 0, 1, 0).unwrap();
    let values = hand.get_finger_pos_all(LEFT).unwrap();
    assert_eq!(values.target[0], 1);
    assert_eq!(hand.transactor().decoder_phase(), DecoderPhase::INITIAL);
}

#[test]
fn test_remote_fault() {
    let (mut hand, _, _) = two_hand_bus(0);

    let err = hand.calibrate(LEFT, 0x1234).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Remote);
    assert_eq!(err.remote_fault(), Some(RemoteFault::STATUS_INIT));

    // The error frame was consumed; the next exchange works.
    assert!(hand.get_finger_pos_all(LEFT).is_ok());
}

#[test]
fn test_invalid_finger_reported_by_hand() {
    let (mut hand, _, _) = two_hand_bus(0);

    let err = hand.set_finger_pos(LEFT, 9, 0, 0).unwrap_err();
    assert_eq!(err.remote_fault(), Some(RemoteFault::INVALID_DATA));
}

#[test]
fn test_timeout_when_nobody_answers() {
    let (mut hand, wire, _) = two_hand_bus(0);

    let err = hand.get_finger_pos_all(0x07).unwrap_err();
    assert!(matches!(err, HandError::Timeout));
    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert_eq!(wire.sent_frames().len(), 1);
    assert_eq!(hand.transactor().decoder_phase(), DecoderPhase::INITIAL);
}

#[test]
fn test_oversized_all_motor_response() {
    let mut bus = MemoryTransport::new();
    bus.set_responder(|req| {
        // Eight motors reported.
        Some(encode_frame(req.src, req.dest, req.command, &[0u8; 32]).unwrap().to_vec())
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    let mut target = [0x5555u16; 6];
    let mut current = [0x5555u16; 6];
    let result = hand.get_finger_pos_all_into(LEFT, &mut target, &mut current);

    assert!(matches!(result, Err(HandError::DataTooLarge)));
    assert_eq!(target, [0x5555; 6]);
    assert_eq!(current, [0x5555; 6]);
}

#[test]
fn test_unmatched_source_and_broadcast() {
    let mut bus = MemoryTransport::new();
    // Always answers from RIGHT, whoever was asked.
    bus.set_responder(|req| {
        Some(encode_frame(req.src, RIGHT, req.command, &[0xE4, 0x0C]).unwrap().to_vec())
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert!(matches!(
        hand.get_battery_voltage(LEFT),
        Err(HandError::UnmatchedAddress { expected: LEFT, actual: RIGHT })
    ));
    assert_eq!(hand.get_battery_voltage(0xFF).unwrap(), 3300);
}

#[test]
fn test_unmatched_command() {
    let mut bus = MemoryTransport::new();
    bus.set_responder(|req| {
        Some(encode_frame(req.src, req.dest, req.command + 1, &[0, 0]).unwrap().to_vec())
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert!(matches!(
        hand.get_battery_voltage(LEFT),
        Err(HandError::UnmatchedCommand { expected: 0x24, actual: 0x25 })
    ));
}

#[test]
fn test_frame_for_other_master_is_ignored() {
    let mut bus = MemoryTransport::new();
    bus.set_responder(|req| {
        let mut bytes = encode_frame(0x09, req.dest, req.command, &[1]).unwrap().to_vec();
        bytes.extend_from_slice(&encode_frame(req.src, req.dest, req.command, &[0]).unwrap());
        Some(bytes)
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert!(!hand.get_beep_switch(LEFT).unwrap());
}

#[test]
fn test_backpressure_drops_second_frame() {
    let mut bus = MemoryTransport::new();
    bus.set_responder(|req| {
        let mut bytes = encode_frame(req.src, req.dest, req.command, &[1]).unwrap().to_vec();
        bytes.extend_from_slice(&encode_frame(req.src, req.dest, req.command, &[2]).unwrap());
        Some(bytes)
    });
    let wire = bus.clone();
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .command_timeout_ms(10)
        .build()
        .unwrap();

    assert_eq!(hand.get_button_pressed_cnt(LEFT).unwrap(), 1);
    // The duplicate was discarded with the poll that completed the first frame.
    assert_eq!(wire.pending_rx(), 0);
    assert_eq!(hand.get_button_pressed_cnt(LEFT).unwrap(), 1);
}

#[test]
fn test_stray_header_byte_before_response() {
    let mut bus = MemoryTransport::new();
    bus.set_responder(|req| {
        let mut bytes = vec![0x55];
        bytes.extend_from_slice(&encode_frame(req.src, req.dest, req.command, &[7]).unwrap());
        Some(bytes)
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert_eq!(hand.get_button_pressed_cnt(LEFT).unwrap(), 7);
}

#[test]
fn test_corrupted_response_then_recovery() {
    let corrupt = Arc::new(Mutex::new(true));
    let flag = Arc::clone(&corrupt);

    let mut bus = MemoryTransport::new();
    bus.set_responder(move |req| {
        let mut bytes = encode_frame(req.src, req.dest, req.command, &[0x10, 0x0E])
            .unwrap()
            .to_vec();
        let mut corrupt = flag.lock().unwrap();
        if *corrupt {
            bytes[6] ^= 0xFF;
            *corrupt = false;
        }
        Some(bytes)
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert!(matches!(
        hand.get_battery_voltage(LEFT),
        Err(HandError::BadChecksum { .. })
    ));
    assert_eq!(hand.get_battery_voltage(LEFT).unwrap(), 0x0E10);
}

#[test]
fn test_transport_failure_is_local() {
    let bus = MemoryTransport::new();
    bus.fail_sends(1);
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    let err = hand.power_off(LEFT).unwrap_err();
    assert!(matches!(err, HandError::TransportFailure(_)));
    assert_eq!(err.category(), ErrorCategory::Local);
}

#[test]
fn test_reply_injected_through_shared_handle() {
    let mut bus = MemoryTransport::new();
    let handle = bus.clone();
    bus.set_responder(move |req| {
        let frame = encode_frame(req.src, req.dest, req.command, &[0x2A]).unwrap();
        handle.inject(&frame);
        None
    });
    let mut hand = OHand::builder()
        .transport(bus)
        .clock(ManualClock::new())
        .build()
        .unwrap();

    assert_eq!(hand.get_button_pressed_cnt(LEFT).unwrap(), 42);
}

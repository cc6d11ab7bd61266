//! Property tests for framing and the transactor.

use proptest::prelude::*;

use ohand_client::codec::{CustomRequest, CustomResponse, SubCommand};
use ohand_client::protocol::{encode_frame, DecoderPhase, FrameDecoder, MAX_SEND_PAYLOAD_SIZE};
use ohand_client::transport::MemoryTransport;
use ohand_client::{HandError, ManualClock, Transactor};

const MASTER: u8 = 0x01;
const HAND: u8 = 0x02;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=MAX_SEND_PAYLOAD_SIZE)
}

proptest! {
    #[test]
    fn prop_encoded_frame_decodes_back(
        command in 0u8..0x80,
        src in any::<u8>(),
        data in payload(),
    ) {
        let bytes = encode_frame(MASTER, src, command, &data).unwrap();
        prop_assert_eq!(bytes.len(), data.len() + 7);

        let mut decoder = FrameDecoder::new(MASTER);
        prop_assert!(decoder.push(&bytes));

        let frame = decoder.take_frame().unwrap();
        prop_assert!(frame.verify_checksum());
        prop_assert_eq!(frame.src, src);
        prop_assert_eq!(frame.command, command);
        prop_assert_eq!(frame.payload(), &data[..]);
        prop_assert_eq!(decoder.phase(), DecoderPhase::INITIAL);
    }

    #[test]
    fn prop_any_chunking_yields_same_frame(
        data in payload(),
        chunk in 1usize..16,
    ) {
        let bytes = encode_frame(MASTER, HAND, 0x0B, &data).unwrap();
        let mut decoder = FrameDecoder::new(MASTER);
        for piece in bytes.chunks(chunk) {
            decoder.push(piece);
        }
        let frame = decoder.take_frame().unwrap();
        prop_assert_eq!(frame.payload(), &data[..]);
    }

    #[test]
    fn prop_flipped_payload_byte_fails_checksum(
        data in prop::collection::vec(any::<u8>(), 1..=MAX_SEND_PAYLOAD_SIZE),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=0xFF,
    ) {
        let mut bytes = encode_frame(MASTER, HAND, 0x22, &data).unwrap().to_vec();
        bytes[6 + index.index(data.len())] ^= flip;

        let mut decoder = FrameDecoder::new(MASTER);
        prop_assert!(decoder.push(&bytes));
        prop_assert!(!decoder.take_frame().unwrap().verify_checksum());

        let mut bus = MemoryTransport::new();
        bus.set_responder(move |_| Some(bytes.clone()));
        let mut transactor = Transactor::new(bus, MASTER);
        transactor.set_clock(ManualClock::new());

        let result = transactor.transact(HAND, 0x22, &[], 64);
        let is_bad_checksum = matches!(result, Err(HandError::BadChecksum { .. }));
        prop_assert!(is_bad_checksum);
        prop_assert_eq!(transactor.decoder_phase(), DecoderPhase::INITIAL);
    }

    #[test]
    fn prop_leading_noise_is_skipped(
        noise in prop::collection::vec(
            any::<u8>().prop_filter("no header", |b| *b != 0x55),
            0..32,
        ),
        data in payload(),
    ) {
        let mut decoder = FrameDecoder::new(MASTER);
        decoder.push(&noise);
        decoder.push(&encode_frame(MASTER, HAND, 0x0C, &data).unwrap());
        let frame = decoder.take_frame().unwrap();
        prop_assert_eq!(frame.payload(), &data[..]);
    }

    #[test]
    fn prop_custom_positions_roundtrip_through_response(
        positions in prop::collection::vec(any::<u16>(), 1..=6),
    ) {
        let request = CustomRequest::new()
            .with_position(positions.clone())
            .get(SubCommand::GET_POS | SubCommand::GET_STATUS);
        let encoded = request.encode().unwrap();
        prop_assert_eq!(encoded.len(), 1 + 2 * positions.len());

        let mut reply = encoded[1..].to_vec();
        reply.extend(std::iter::repeat(0).take(positions.len()));
        let response = CustomResponse::decode(request.get_flags(), &reply).unwrap();

        prop_assert_eq!(response.motor_count, positions.len());
        prop_assert_eq!(response.position, Some(positions));
    }
}

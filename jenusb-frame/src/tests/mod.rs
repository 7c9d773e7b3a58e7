use super::*;

use rand::Rng;

fn rx_frame(src: Address, dst: Address, sdu: &[u8]) -> RxFrame {
    RxFrame {
        src: src.into(),
        dst: dst.into(),
        link_quality: 0xff,
        security_use: false,
        acl_entry: 0,
        sdu: Sdu::from_slice(sdu).unwrap(),
    }
}

#[test]
fn decode_intra_pan() {
    let frame = rx_frame(
        Address::Short {
            pan_id: 0x1234,
            address: 0x0002,
        },
        Address::Short {
            pan_id: 0x1234,
            address: 0x0001,
        },
        &[],
    );

    let mpdu = decode_native_to_mpdu(&frame).unwrap();
    // fc, seq, dst pan, dst address, src address
    assert_eq!(mpdu.len(), 3 + 4 + 2);

    let fc = FrameControl::new(&mpdu[..]).unwrap();
    assert_eq!(fc.frame_type(), FrameType::Data);
    assert!(fc.intra_pan());
    assert!(!fc.frame_pending());
    assert!(!fc.ack_request());
    assert_eq!(fc.frame_version(), FrameVersion::Ieee802154_2003);
    assert_eq!(mpdu[2], 0);
}

#[test]
fn decode_inter_pan() {
    let frame = rx_frame(
        Address::Short {
            pan_id: 0xabcd,
            address: 0x0002,
        },
        Address::Short {
            pan_id: 0x1234,
            address: 0x0001,
        },
        &[],
    );

    let mpdu = decode_native_to_mpdu(&frame).unwrap();
    assert_eq!(mpdu.len(), 3 + 4 + 4);
    assert!(!FrameControl::new(&mpdu[..]).unwrap().intra_pan());
    assert_eq!(&mpdu[7..], &[0xcd, 0xab, 0x02, 0x00]);
}

#[test]
fn decode_extended_source() {
    let frame = rx_frame(
        Address::Extended {
            pan_id: 0x1234,
            address: 0x0011_2233_4455_6677,
        },
        Address::Short {
            pan_id: 0x1234,
            address: 0x0000,
        },
        &[0xaa],
    );

    let mpdu = decode_native_to_mpdu(&frame).unwrap();
    let fc = FrameControl::new(&mpdu[..]).unwrap();
    assert!(!fc.intra_pan());
    assert_eq!(fc.src_addressing_mode(), AddressingMode::Extended);
    assert_eq!(
        &mpdu[..],
        &[
            0x01, 0xc8, 0x00, 0x34, 0x12, 0x00, 0x00, 0x34, 0x12, 0x77, 0x66, 0x55, 0x44, 0x33,
            0x22, 0x11, 0x00, 0xaa
        ]
    );
}

#[test]
fn decode_security_bit() {
    let mut frame = rx_frame(
        Address::None,
        Address::Short {
            pan_id: 0x1234,
            address: 0x0001,
        },
        &[1],
    );
    frame.security_use = true;

    let mpdu = decode_native_to_mpdu(&frame).unwrap();
    let fc = FrameControl::new(&mpdu[..]).unwrap();
    assert!(fc.security_enabled());
    assert_eq!(fc.src_addressing_mode(), AddressingMode::Absent);
}

#[test]
fn decode_unknown_address_mode() {
    let mut frame = rx_frame(Address::None, Address::None, &[]);
    frame.src.mode = 0x01;
    assert_eq!(decode_native_to_mpdu(&frame), Err(Error::AddressMode));
}

#[test]
fn decode_oversized() {
    let ext = Address::Extended {
        pan_id: 0x0001,
        address: 0x0102_0304_0506_0708,
    };
    let frame = rx_frame(ext, ext, &[0u8; MAX_SDU_LEN]);
    assert_eq!(decode_native_to_mpdu(&frame), Err(Error::Allocation));
}

#[test]
fn encode_destination_only() {
    // data, short dst, no src
    let mpdu = [0x41, 0x08, 0x2a, 0x34, 0x12, 0x01, 0x00, 0x01, 0x02, 0x03];

    let frame = encode_mpdu_to_native(&mpdu).unwrap();
    assert_eq!(
        frame.dst,
        Address::Short {
            pan_id: 0x1234,
            address: 0x0001
        }
    );
    assert_eq!(frame.src, Address::None);
    assert_eq!(&frame.sdu[..], &[1, 2, 3]);
    assert!(frame.options.is_empty());
}

#[test]
fn encode_source_follows_source_mode() {
    // data, ack request, short dst, extended src, not intra-PAN
    let mpdu = [
        0x21, 0xc8, 0x00, 0x34, 0x12, 0xff, 0xff, 0xcd, 0xab, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03,
        0x02, 0x01,
    ];

    let frame = encode_mpdu_to_native(&mpdu).unwrap();
    assert_eq!(
        frame.src,
        Address::Extended {
            pan_id: 0xabcd,
            address: 0x0102_0304_0506_0708
        }
    );
    assert!(frame.dst.is_broadcast());
    assert_eq!(frame.options, TxOptions::ACK);
    assert!(frame.sdu.is_empty());
}

#[test]
fn encode_intra_pan_source_takes_destination_pan() {
    let mpdu = [0x41, 0x88, 0x00, 0x34, 0x12, 0x01, 0x00, 0x02, 0x00];
    let frame = encode_mpdu_to_native(&mpdu).unwrap();
    assert_eq!(
        frame.src,
        Address::Short {
            pan_id: 0x1234,
            address: 0x0002
        }
    );
}

#[test]
fn encode_rejects_non_data() {
    // beacon
    let mpdu = [0x00, 0x80, 0x00, 0x34, 0x12, 0x01, 0x00];
    assert_eq!(
        encode_mpdu_to_native(&mpdu),
        Err(Error::UnsupportedFrameType)
    );
}

#[test]
fn encode_rejects_missing_addresses() {
    assert_eq!(
        encode_mpdu_to_native(&[0x01, 0x00, 0x00, 0xaa]),
        Err(Error::MissingAddress)
    );
}

#[test]
fn encode_rejects_truncated() {
    assert_eq!(encode_mpdu_to_native(&[0x41]), Err(Error::Truncated));
    assert_eq!(
        encode_mpdu_to_native(&[0x41, 0x88, 0x00, 0x34, 0x12]),
        Err(Error::Truncated)
    );
}

#[test]
fn encode_rejects_long_payload() {
    let mut mpdu = std::vec![0x41, 0x08, 0x00, 0x34, 0x12, 0x01, 0x00];
    mpdu.resize(MAX_MPDU_LEN, 0);
    assert_eq!(encode_mpdu_to_native(&mpdu), Err(Error::PayloadTooLong));
}

fn random_address(rng: &mut impl Rng, pan_id: u16) -> Address {
    match rng.gen_range(0..3) {
        0 => Address::None,
        1 => Address::Short {
            pan_id,
            address: rng.gen(),
        },
        _ => Address::Extended {
            pan_id,
            address: rng.gen(),
        },
    }
}

#[test]
fn random_frames_survive_the_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..1000 {
        let dst_pan = rng.gen();
        let src_pan = if rng.gen_bool(0.5) { dst_pan } else { rng.gen() };
        let dst = random_address(&mut rng, dst_pan);
        let src = random_address(&mut rng, src_pan);
        if dst.is_none() && src.is_none() {
            continue;
        }

        let layout = AddressingLayout::new(&dst, &src);
        let room = MAX_MPDU_LEN - codec::MPDU_HEADER_LEN - layout.len();
        let len = rng.gen_range(0..=room.min(MAX_SDU_LEN));
        let payload: std::vec::Vec<u8> = (0..len).map(|_| rng.gen()).collect();

        let mpdu = decode_native_to_mpdu(&rx_frame(src, dst, &payload)).unwrap();
        assert_eq!(mpdu.len(), codec::MPDU_HEADER_LEN + layout.len() + len);

        let frame = encode_mpdu_to_native(&mpdu).unwrap();
        assert_eq!(frame.dst, dst);
        assert_eq!(frame.src, src);
        assert_eq!(&frame.sdu[..], &payload[..]);
    }
}

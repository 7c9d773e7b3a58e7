#![no_main]

use jenusb_frame::{decode_native_to_mpdu, encode_mpdu_to_native, Address, RxFrame, Sdu};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Address, Address, Vec<u8>)| {
    let (dst, src, payload) = input;
    let Ok(sdu) = Sdu::from_slice(&payload) else {
        return;
    };

    let frame = RxFrame {
        src: src.into(),
        dst: dst.into(),
        link_quality: 0,
        security_use: false,
        acl_entry: 0,
        sdu,
    };

    let Ok(mpdu) = decode_native_to_mpdu(&frame) else {
        return;
    };
    if let Ok(tx) = encode_mpdu_to_native(&mpdu) {
        assert_eq!(tx.dst, dst);
        assert_eq!(tx.src, src);
        assert_eq!(tx.sdu, frame.sdu);
    }
});

#![no_main]

use jenusb_frame::{decode_native_to_mpdu, encode_mpdu_to_native, RxFrame};

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > RxFrame::SIZE {
        return Corpus::Reject;
    }

    let Ok(frame) = RxFrame::parse(data) else {
        return Corpus::Keep;
    };

    if let Ok(mpdu) = decode_native_to_mpdu(&frame) {
        if let Ok(tx) = encode_mpdu_to_native(&mpdu) {
            assert_eq!(tx.sdu, frame.sdu);
        }
    }

    Corpus::Keep
});

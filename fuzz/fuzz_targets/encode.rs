#![no_main]

use jenusb_frame::{encode_mpdu_to_native, TxFrame, MAX_MPDU_LEN};

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > MAX_MPDU_LEN {
        return Corpus::Reject;
    }

    if let Ok(frame) = encode_mpdu_to_native(data) {
        let mut buffer = [0u8; TxFrame::SIZE];
        frame.emit(&mut buffer);
        assert_eq!(TxFrame::parse(&buffer), Ok(frame));
    }

    Corpus::Keep
});

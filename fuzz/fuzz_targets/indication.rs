#![no_main]

use jenusb::mac::Indication;

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > Indication::SIZE {
        return Corpus::Reject;
    }

    if let Ok(indication) = Indication::parse(data) {
        let mut buffer = [0u8; Indication::SIZE];
        indication.emit(&mut buffer);
    }

    Corpus::Keep
});

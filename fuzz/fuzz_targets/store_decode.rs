#![no_main]

extern crate libfuzzer_sys;
extern crate trial_grid;

use libfuzzer_sys::fuzz_target;
use trial_grid::store::codec;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Anything that decodes must survive being written and read back
    if let Ok(rows) = codec::decode(&text) {
        let encoded = codec::encode(&rows);
        let decoded = codec::decode(&encoded).expect("encoded rows decode");
        assert_eq!(rows, decoded);
    }
});

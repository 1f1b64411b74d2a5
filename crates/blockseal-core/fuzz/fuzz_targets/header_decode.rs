#![no_main]
use ciborium::de::from_reader;
use libfuzzer_sys::fuzz_target;
use blockseal_core::Header;

fuzz_target!(|data: &[u8]| {
    if let Ok(h) = from_reader::<Header, _>(data) {
        let _ = h.leaf_value();
    }
    if let Ok(h) = serde_json::from_slice::<Header>(data) {
        let _ = h.leaf_value();
    }
});

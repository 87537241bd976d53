#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(dps) = nfse::xml::from_xml_bytes::<nfse::Dps>(data) {
        // Anything we accept must serialize and read back identically.
        if let Ok(wire) = nfse::xml::to_xml(&dps) {
            let back = nfse::xml::from_xml::<nfse::Dps>(&wire)
                .expect("re-parse of serialized DPS failed");
            assert_eq!(back, dps, "DPS changed across a round trip");
        }
    }
});

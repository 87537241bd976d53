#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(parts) = nfse::DpsId::decompose(s) {
            let id = nfse::DpsId::compose(&parts).expect("decomposed parts must compose");
            assert_eq!(id.as_str(), s);
        }
    }
});

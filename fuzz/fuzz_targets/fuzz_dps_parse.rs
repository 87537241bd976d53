#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    let _ = nfse::xml::from_xml_bytes::<nfse::Dps>(data);
});

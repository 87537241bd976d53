#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = nfse::xml::from_xml_bytes::<nfse::NfseResponse>(data);
    let _ = nfse::xml::from_xml_bytes::<nfse::EventList>(data);
});

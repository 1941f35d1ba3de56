#![no_main]
use certseed_asn1::{encode_pdu, Pdu};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|pdu: Pdu| {
    // Must terminate for any tree; deliberately malformed output is fine.
    let _ = encode_pdu(&pdu);
});

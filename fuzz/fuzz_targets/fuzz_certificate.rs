#![no_main]
use certseed_x509::{encode_certificate, X509Certificate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|certificate: X509Certificate| {
    let _ = encode_certificate(&certificate);
});

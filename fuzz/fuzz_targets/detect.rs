#![no_main]

use std::io::BufReader;

use linebreak::{detect_from, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // data[0] picks the buffer capacity, detection must not depend on it.
    let capacity = usize::from(data[0]).max(1);
    let payload = &data[1..];

    let expected = Format::detect(payload);
    let mut reader = BufReader::with_capacity(capacity, payload);
    assert_eq!(detect_from(&mut reader).ok(), Some(expected));

    for target in Format::ALL {
        let converted = target.normalize(payload);
        if converted.iter().any(|&b| b == b'\r' || b == b'\n') {
            assert_eq!(Format::detect(&converted), target);
        }
    }
});

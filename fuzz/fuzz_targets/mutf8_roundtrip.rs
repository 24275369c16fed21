#![no_main]

use libfuzzer_sys::fuzz_target;
use rscan_wire::{mutf8, BufferReader};

// Fuzz target: writeUTF encode -> read_utf roundtrip.
//
// Any valid string (NUL and supplementary characters included) must
// decode to itself and consume exactly the encoded bytes.
fuzz_target!(|s: &str| {
    let mut buf = Vec::new();
    let Ok(written) = mutf8::encode_into(s, &mut buf) else {
        return;
    };
    assert_eq!(written, buf.len());

    let mut reader = BufferReader::new(&buf);
    assert_eq!(reader.read_utf().unwrap(), s);
    assert!(!reader.has_remaining());
});

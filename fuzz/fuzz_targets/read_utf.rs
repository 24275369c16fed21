#![no_main]

use libfuzzer_sys::fuzz_target;
use rscan_wire::BufferReader;

// Fuzz target: BufferReader::read_utf over arbitrary bytes.
//
// Reads strings back to back until one fails. Catches bugs in:
// - ASCII fast path / sequence decoder hand-off
// - Partial-character detection at the declared length
// - Cursor bookkeeping (success advances by 2 + L, failure by at most 2)
fuzz_target!(|data: &[u8]| {
    let mut reader = BufferReader::new(data);
    loop {
        let before = reader.position();
        let declared = data
            .get(before..before + 2)
            .map(|b| usize::from(u16::from_be_bytes([b[0], b[1]])));
        match reader.read_utf() {
            Ok(_) => assert_eq!(Some(reader.position() - before - 2), declared),
            Err(_) => {
                assert!(reader.position() - before <= 2);
                break;
            }
        }
    }
});

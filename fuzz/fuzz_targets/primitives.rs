#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rscan_wire::BufferReader;

#[derive(Arbitrary, Debug)]
enum Op {
    Bool,
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Char,
    Int,
    Long,
    Float,
    Double,
    Utf,
    Skip(u8),
    Fully(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    ops: Vec<Op>,
    buf: Vec<u8>,
}

// Fuzz target: arbitrary sequences of reads against one buffer.
//
// Every checked read must either succeed or leave the cursor where it
// was (read_utf may consume its 2-byte prefix). skip_bytes never fails.
fuzz_target!(|input: Input| {
    let mut reader = BufferReader::new(&input.buf);
    for op in input.ops {
        let before = reader.position();
        let ok = match op {
            Op::Bool => reader.read_bool().is_ok(),
            Op::Byte => reader.read_byte().is_ok(),
            Op::UnsignedByte => reader.read_unsigned_byte().is_ok(),
            Op::Short => reader.read_short().is_ok(),
            Op::UnsignedShort => reader.read_unsigned_short().is_ok(),
            Op::Char => reader.read_char().is_ok(),
            Op::Int => reader.read_int().is_ok(),
            Op::Long => reader.read_long().is_ok(),
            Op::Float => reader.read_float().is_ok(),
            Op::Double => reader.read_double().is_ok(),
            Op::Utf => {
                if reader.read_utf().is_err() {
                    assert!(reader.position() - before <= 2);
                }
                continue;
            }
            Op::Skip(n) => {
                assert_eq!(reader.skip_bytes(usize::from(n)), usize::from(n));
                continue;
            }
            Op::Fully(n) => {
                let mut dest = vec![0u8; usize::from(n)];
                reader.read_fully(&mut dest).is_ok()
            }
        };
        if !ok {
            assert_eq!(reader.position(), before);
        }
    }
});

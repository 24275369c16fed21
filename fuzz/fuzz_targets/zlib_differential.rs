#![no_main]

use std::io::Write;

use flate2::write::ZlibEncoder;
use libfuzzer_sys::fuzz_target;
use rscan_inflate::{Inflate, InternalInflater, ScratchBuffer, StandardInflater};

// Fuzz target: internal vs standard zlib inflate.
//
// First byte selects the compression level and scratch size; the rest
// is compressed with flate2 and must come back identical from both
// inflaters. The raw input is also fed to both as a (usually invalid)
// stream: neither may panic, and if both succeed they must agree.
fuzz_target!(|data: &[u8]| {
    let Some((&knobs, payload)) = data.split_first() else {
        return;
    };

    let mut enc = ZlibEncoder::new(Vec::new(), flate2::Compression::new(u32::from(knobs % 10)));
    enc.write_all(payload).unwrap();
    let compressed = enc.finish().unwrap();

    let mut scratch = ScratchBuffer::with_len(usize::from(knobs >> 4));
    let internal = InternalInflater
        .decode_zlib(&compressed, Some(&mut scratch))
        .unwrap()
        .into_owned();
    let standard = StandardInflater.decode_zlib(&compressed, None).unwrap();
    assert_eq!(internal, payload);
    assert_eq!(&*standard, payload);

    if let (Ok(a), Ok(b)) = (
        InternalInflater.decode_zlib(payload, None),
        StandardInflater.decode_zlib(payload, None),
    ) {
        assert_eq!(a, b);
    }
});

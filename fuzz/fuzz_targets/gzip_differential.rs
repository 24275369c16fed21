#![no_main]

use std::io::Write;

use flate2::write::GzEncoder;
use libfuzzer_sys::fuzz_target;
use rscan_inflate::{Inflate, InternalInflater, StandardInflater};

// Fuzz target: internal vs standard gzip inflate.
//
// The input is split at its first byte into two members so the
// multi-member path is exercised on every run.
fuzz_target!(|data: &[u8]| {
    let Some((&split, payload)) = data.split_first() else {
        return;
    };
    let at = usize::from(split).min(payload.len());

    let mut compressed = Vec::new();
    for part in [&payload[..at], &payload[at..]] {
        let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(part).unwrap();
        compressed.extend_from_slice(&enc.finish().unwrap());
    }

    let internal = InternalInflater.decode_gzip(&compressed, None).unwrap();
    let standard = StandardInflater.decode_gzip(&compressed, None).unwrap();
    assert_eq!(&*internal, payload);
    assert_eq!(&*standard, payload);

    // Raw input: no panics; agreement when both accept it.
    if let (Ok(a), Ok(b)) = (
        InternalInflater.decode_gzip(payload, None),
        StandardInflater.decode_gzip(payload, None),
    ) {
        assert_eq!(a, b);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use rscan_inflate::gzip::GzipHeader;

// Fuzz target: GzipHeader::parse on raw bytes.
//
// Catches bugs in:
// - FEXTRA length handling near the end of input
// - Unterminated FNAME / FCOMMENT fields
// - FHCRC bounds
fuzz_target!(|data: &[u8]| {
    if let Ok((_, end)) = GzipHeader::parse(data, 0) {
        assert!(end <= data.len());
    }
});

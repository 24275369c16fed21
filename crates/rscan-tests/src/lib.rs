//! Shared fixtures for the rscan integration tests and benches.
//!
//! Compressed inputs are produced on the fly with `flate2`'s encoders so
//! every test sees a stream written by an independent implementation.
//!
//! | Sample           | Shape                                               |
//! |------------------|-----------------------------------------------------|
//! | `empty`          | zero bytes                                          |
//! | `hello`          | `b"hello"`                                          |
//! | `text`           | a few KiB of repeated prose                         |
//! | `repetitive(n)`  | `n` bytes of a 7-byte cycle, compresses ~1000:1     |
//! | `noise(n)`       | `n` bytes from an LCG, barely compresses            |

#![allow(clippy::pedantic)]

use std::io::Write;

use flate2::Compression as Level;
use flate2::GzBuilder;
use flate2::write::{GzEncoder, ZlibEncoder};

/// One MiB; large enough to force several doublings of any scratch buffer
/// sized from the compressed input.
pub const LARGE: usize = 1 << 20;

/// A named uncompressed sample.
#[derive(Clone, Debug)]
pub struct Sample {
    pub name: &'static str,
    pub data: Vec<u8>,
}

#[must_use]
pub fn repetitive(len: usize) -> Vec<u8> {
    b"region\n".iter().copied().cycle().take(len).collect()
}

/// Deterministic pseudo-random bytes (Numerical Recipes LCG).
#[must_use]
pub fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

#[must_use]
pub fn text() -> Vec<u8> {
    "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs.\n"
        .repeat(64)
        .into_bytes()
}

/// The standard sample set used by the differential tests.
#[must_use]
pub fn samples() -> Vec<Sample> {
    vec![
        Sample { name: "empty", data: Vec::new() },
        Sample { name: "hello", data: b"hello".to_vec() },
        Sample { name: "text", data: text() },
        Sample { name: "repetitive_1mib", data: repetitive(LARGE) },
        Sample { name: "noise_64kib", data: noise(64 * 1024) },
    ]
}

#[must_use]
pub fn zlib(data: &[u8], level: u32) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Level::new(level));
    enc.write_all(data).expect("write to Vec");
    enc.finish().expect("finish zlib stream")
}

#[must_use]
pub fn gzip(data: &[u8], level: u32) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Level::new(level));
    enc.write_all(data).expect("write to Vec");
    enc.finish().expect("finish gzip member")
}

/// A gzip member carrying every optional header field (FEXTRA, FNAME,
/// FCOMMENT).
#[must_use]
pub fn gzip_with_header_fields(data: &[u8]) -> Vec<u8> {
    let mut enc = GzBuilder::new()
        .filename("r.0.0.mca")
        .comment("scanned region")
        .extra(vec![0x52, 0x53, 0x02, 0x00, 0xCA, 0xFE])
        .mtime(1_700_000_000)
        .write(Vec::new(), Level::default());
    enc.write_all(data).expect("write to Vec");
    enc.finish().expect("finish gzip member")
}

/// Concatenate one gzip member per part.
#[must_use]
pub fn gzip_members(parts: &[&[u8]]) -> Vec<u8> {
    parts.iter().flat_map(|p| gzip(p, 6)).collect()
}

/// `[i32 BE length][id][payload]` as read by `Inflate::decode_framed`.
#[must_use]
pub fn frame(id: u8, payload: &[u8]) -> Vec<u8> {
    let length = i32::try_from(payload.len() + 1).expect("frame fits in i32");
    let mut out = Vec::with_capacity(payload.len() + 5);
    out.extend_from_slice(&length.to_be_bytes());
    out.push(id);
    out.extend_from_slice(payload);
    out
}

/// Write `s` the way a Java `DataOutput::writeUTF` would.
#[must_use]
pub fn utf_record(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    rscan_wire::mutf8::encode_into(s, &mut out).expect("string fits in a u16 length");
    out
}

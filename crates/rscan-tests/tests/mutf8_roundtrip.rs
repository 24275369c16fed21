//! Property tests for the modified UTF-8 codec.
//!
//! Strings are written with the `writeUTF` encoder (NUL as `C0 80`,
//! supplementary characters as two 3-byte surrogates) and read back
//! through `BufferReader::read_utf`.

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;
use rscan_wire::{BufferReader, mutf8};

fn record(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    mutf8::encode_into(s, &mut out).ok()?;
    Some(out)
}

#[test]
fn any_string_round_trips() {
    fn prop(s: String) -> TestResult {
        let Some(bytes) = record(&s) else {
            return TestResult::discard();
        };
        let mut reader = BufferReader::new(&bytes);
        let decoded = reader.read_utf();
        TestResult::from_bool(decoded.as_deref() == Ok(s.as_str()) && !reader.has_remaining())
    }

    QuickCheck::new()
        .tests(2_000)
        .quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn consecutive_records_keep_alignment() {
    fn prop(strings: Vec<String>, tail: u32) -> TestResult {
        let mut bytes = Vec::new();
        for s in &strings {
            if mutf8::encode_into(s, &mut bytes).is_err() {
                return TestResult::discard();
            }
        }
        bytes.extend_from_slice(&tail.to_be_bytes());

        let mut reader = BufferReader::new(&bytes);
        for s in &strings {
            if reader.read_utf().as_deref() != Ok(s.as_str()) {
                return TestResult::failed();
            }
        }
        TestResult::from_bool(reader.read_int() == Ok(tail as i32))
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<String>, u32) -> TestResult);
}

#[quickcheck]
fn encoded_len_matches_prefix(s: String) -> TestResult {
    let Some(bytes) = record(&s) else {
        return TestResult::discard();
    };
    let declared = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    TestResult::from_bool(declared == mutf8::encoded_len(&s) && bytes.len() == declared + 2)
}

#[quickcheck]
fn decode_never_panics(bytes: Vec<u8>) -> bool {
    // Canonical re-encoding is never longer than the input, except that a
    // raw zero byte decodes to NUL, which re-encodes as `C0 80`.
    match mutf8::decode(&bytes) {
        Ok(s) => mutf8::encoded_len(&s) <= bytes.len() || bytes.contains(&0),
        Err(e) => e.is_malformed(),
    }
}

#[quickcheck]
fn bmp_strings_never_use_four_byte_forms(chars: Vec<char>) -> bool {
    let s: String = chars
        .into_iter()
        .filter(|c| u32::from(*c) <= 0xFFFF)
        .collect();
    let mut out = Vec::new();
    if mutf8::encode_into(&s, &mut out).is_err() {
        return true;
    }
    out[2..].iter().all(|&b| b >> 3 != 0b11110)
}

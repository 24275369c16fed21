//! Differential tests: both decompressor variants must agree byte for byte
//! on every valid input, and both must reject damaged input.
//!
//! Inputs come from `flate2`'s encoders, so neither variant is checked
//! against itself. The sample set includes a 1 MiB payload that
//! compresses roughly a thousandfold, which forces the output buffer
//! through many doublings.

use std::borrow::Cow;

use rscan_inflate::{Decompressor, Inflate, InflateError, ScratchBuffer};
use rscan_tests::{gzip, gzip_members, gzip_with_header_fields, repetitive, samples, zlib};

// ── zlib ──────────────────────────────────────────────────────────────────────

#[test]
fn zlib_variants_agree_on_samples() {
    for sample in samples() {
        for level in [0, 1, 6, 9] {
            let input = zlib(&sample.data, level);
            for d in Decompressor::ALL {
                let out = d
                    .decode_zlib(&input, None)
                    .unwrap_or_else(|e| panic!("{d} failed on {} level {level}: {e}", sample.name));
                assert!(
                    *out == *sample.data,
                    "{d} output differs on {} level {level}",
                    sample.name
                );
            }
        }
    }
}

#[test]
fn zlib_into_one_byte_scratch() {
    let data = repetitive(300_000);
    let input = zlib(&data, 9);
    for d in Decompressor::ALL {
        let mut scratch = ScratchBuffer::with_len(1);
        let out = d.decode_zlib(&input, Some(&mut scratch)).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)), "{d} should decode into scratch");
        assert_eq!(out.len(), data.len());
        assert!(*out == *data);
    }
}

#[test]
fn zlib_scratch_reused_across_calls() {
    let big = repetitive(100_000);
    let small = b"tiny".to_vec();
    let inputs = [zlib(&big, 6), zlib(&small, 6), zlib(&big, 1)];
    let expected = [&big, &small, &big];

    for d in Decompressor::ALL {
        let mut scratch = ScratchBuffer::new();
        let mut high_water = 0;
        for (input, want) in inputs.iter().zip(expected) {
            let out = d.decode_zlib(input, Some(&mut scratch)).unwrap();
            assert!(*out == **want);
            drop(out);
            assert!(scratch.len() >= high_water, "scratch must never shrink");
            high_water = scratch.len();
        }
    }
}

#[test]
fn zlib_truncation_rejected_by_both() {
    let input = zlib(&rscan_tests::text(), 6);
    for cut in [0, 1, 2, 10, input.len() / 2, input.len() - 1] {
        for d in Decompressor::ALL {
            let err = d.decode_zlib(&input[..cut], None).unwrap_err();
            assert!(err.is_bad_data(), "{d} cut at {cut}: {err}");
        }
    }
}

#[test]
fn zlib_corrupt_checksum_rejected_by_both() {
    let mut input = zlib(b"checksum me", 6);
    let last = input.len() - 1;
    input[last] ^= 0xFF;
    for d in Decompressor::ALL {
        assert!(d.decode_zlib(&input, None).unwrap_err().is_bad_data(), "{d}");
    }
}

#[test]
fn zlib_bad_header_rejected_by_both() {
    let mut input = zlib(b"header", 6);
    input[0] = 0x00;
    for d in Decompressor::ALL {
        assert!(d.decode_zlib(&input, None).unwrap_err().is_bad_data(), "{d}");
    }
}

// ── gzip ──────────────────────────────────────────────────────────────────────

#[test]
fn gzip_variants_agree_on_samples() {
    // An empty buffer is not a gzip stream for the internal parser, and a
    // member of an empty payload is covered separately.
    for sample in samples().into_iter().filter(|s| !s.data.is_empty()) {
        let input = gzip(&sample.data, 6);
        for d in Decompressor::ALL {
            let out = d
                .decode_gzip(&input, None)
                .unwrap_or_else(|e| panic!("{d} failed on {}: {e}", sample.name));
            assert!(*out == *sample.data, "{d} output differs on {}", sample.name);
        }
    }
}

#[test]
fn gzip_member_of_empty_payload() {
    let input = gzip(b"", 6);
    for d in Decompressor::ALL {
        let out = d.decode_gzip(&input, None).unwrap();
        assert!(out.is_empty(), "{d}");
    }
}

#[test]
fn gzip_optional_header_fields() {
    let data = rscan_tests::text();
    let input = gzip_with_header_fields(&data);
    for d in Decompressor::ALL {
        let out = d.decode_gzip(&input, None).unwrap();
        assert!(*out == *data, "{d}");
    }
}

#[test]
fn gzip_multiple_members_concatenate() {
    let big = repetitive(200_000);
    let input = gzip_members(&[&b"first,"[..], big.as_slice(), &[], &b"last"[..]]);
    let mut expected = b"first,".to_vec();
    expected.extend_from_slice(&big);
    expected.extend_from_slice(b"last");

    for d in Decompressor::ALL {
        let out = d.decode_gzip(&input, None).unwrap();
        assert_eq!(out.len(), expected.len(), "{d}");
        assert!(*out == *expected, "{d}");
    }
}

#[test]
fn gzip_internal_uses_scratch_standard_allocates() {
    let input = gzip(b"scratch policy", 6);
    let mut scratch = ScratchBuffer::with_len(1);

    let out = Decompressor::Internal
        .decode_gzip(&input, Some(&mut scratch))
        .unwrap();
    assert!(matches!(out, Cow::Borrowed(b"scratch policy")));

    let mut untouched = ScratchBuffer::with_len(1);
    let out = Decompressor::Standard
        .decode_gzip(&input, Some(&mut untouched))
        .unwrap();
    assert!(matches!(out, Cow::Owned(_)));
    assert_eq!(&*out, b"scratch policy");
    assert_eq!(untouched.len(), 1);
}

#[test]
fn gzip_corrupt_crc_rejected_by_both() {
    let mut input = gzip(b"crc target", 6);
    let crc_at = input.len() - 8;
    input[crc_at] ^= 0x01;
    for d in Decompressor::ALL {
        assert!(d.decode_gzip(&input, None).unwrap_err().is_bad_data(), "{d}");
    }
}

#[test]
fn gzip_corrupt_size_rejected_by_both() {
    let mut input = gzip(b"isize target", 6);
    let size_at = input.len() - 4;
    input[size_at] ^= 0x01;
    for d in Decompressor::ALL {
        assert!(d.decode_gzip(&input, None).unwrap_err().is_bad_data(), "{d}");
    }
}

#[test]
fn gzip_truncation_rejected_by_both() {
    let input = gzip(&rscan_tests::text(), 6);
    for cut in [1, 5, 10, input.len() / 2, input.len() - 4, input.len() - 1] {
        for d in Decompressor::ALL {
            let err = d.decode_gzip(&input[..cut], None).unwrap_err();
            assert!(err.is_bad_data(), "{d} cut at {cut}: {err}");
        }
    }
}

#[test]
fn gzip_wrong_magic_rejected_by_both() {
    let mut input = gzip(b"magic", 6);
    input[1] = 0x8C;
    for d in Decompressor::ALL {
        assert!(d.decode_gzip(&input, None).unwrap_err().is_bad_data(), "{d}");
    }
    assert!(matches!(
        Decompressor::Internal.decode_gzip(&input, None),
        Err(InflateError::InvalidGzipHeader { offset: 0, .. })
    ));
}

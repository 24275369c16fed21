//! Modified UTF-8, the legacy 1/2/3-byte text encoding used by classic
//! data-stream formats.
//!
//! ```text
//! ┌───────────────┬──────────────────────────────────────┬─────────────────┐
//! │ Code unit     │ Bytes                                │ Lead (top bits) │
//! ├───────────────┼──────────────────────────────────────┼─────────────────┤
//! │ 0x0001-0x007F │ 0xxxxxxx                             │ 0x0-0x7         │
//! │ 0x0000,       │ 110xxxxx 10xxxxxx                    │ 0xC-0xD         │
//! │ 0x0080-0x07FF │                                      │                 │
//! │ 0x0800-0xFFFF │ 1110xxxx 10xxxxxx 10xxxxxx           │ 0xE             │
//! └───────────────┴──────────────────────────────────────┴─────────────────┘
//! ```
//!
//! It differs from standard UTF-8 in two ways: NUL is written as the
//! two-byte `C0 80`, and characters outside the BMP are written as a
//! UTF-16 surrogate pair, each half as its own 3-byte sequence. There
//! are no 4-byte sequences.
//!
//! On the wire a string is `[u16 BE byte length][payload]`.

use crate::error::WireError;

/// Largest payload a `u16` length prefix can describe.
pub const MAX_ENCODED_LEN: usize = u16::MAX as usize;

/// Classification of a lead byte by its top four bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lead {
    /// `0xxx` — one byte, one code unit.
    Single,
    /// `110x` — followed by one continuation byte.
    Double,
    /// `1110` — followed by two continuation bytes.
    Triple,
    /// `10xx` or `1111` — never valid as a lead byte.
    Invalid,
}

impl Lead {
    fn classify(byte: u8) -> Self {
        match byte >> 4 {
            0x0..=0x7 => Self::Single,
            0xC | 0xD => Self::Double,
            0xE => Self::Triple,
            _ => Self::Invalid,
        }
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Copy the leading run of ASCII bytes into `chars`.
///
/// Returns how many bytes were copied. Stops at the first byte above
/// `0x7F` or at the end of `bytes`. `chars` must be at least as long as
/// `bytes`.
pub(crate) fn ascii_prefix(bytes: &[u8], chars: &mut [u16]) -> usize {
    let mut count = 0;
    while count < bytes.len() {
        let byte = bytes[count];
        if byte > 0x7F {
            break;
        }
        chars[count] = u16::from(byte);
        count += 1;
    }
    count
}

/// Decode `bytes[start..]` into `chars[start..]`.
///
/// `bytes[..start]` must already have been copied into `chars[..start]`
/// by [`ascii_prefix`]. Returns the total number of code units written.
///
/// # Errors
///
/// - [`WireError::PartialCharacter`] if a multi-byte sequence would run
///   past the end of `bytes`.
/// - [`WireError::MalformedInput`] for an invalid lead byte (offset of
///   the lead), a bad continuation in a 2-byte sequence (offset just past
///   the sequence) or in a 3-byte sequence (offset of its last byte).
pub(crate) fn decode_from(bytes: &[u8], start: usize, chars: &mut [u16]) -> Result<usize, WireError> {
    let len = bytes.len();
    let mut count = start;
    let mut written = start;

    while count < len {
        let lead = bytes[count];
        let unit = match Lead::classify(lead) {
            Lead::Single => {
                count += 1;
                u16::from(lead)
            }
            Lead::Double => {
                if count + 2 > len {
                    return Err(WireError::PartialCharacter { offset: count });
                }
                let second = bytes[count + 1];
                count += 2;
                if !is_continuation(second) {
                    return Err(WireError::MalformedInput { offset: count });
                }
                (u16::from(lead & 0x1F) << 6) | u16::from(second & 0x3F)
            }
            Lead::Triple => {
                if count + 3 > len {
                    return Err(WireError::PartialCharacter { offset: count });
                }
                let second = bytes[count + 1];
                let third = bytes[count + 2];
                count += 3;
                if !is_continuation(second) || !is_continuation(third) {
                    return Err(WireError::MalformedInput { offset: count - 1 });
                }
                (u16::from(lead & 0x0F) << 12)
                    | (u16::from(second & 0x3F) << 6)
                    | u16::from(third & 0x3F)
            }
            Lead::Invalid => return Err(WireError::MalformedInput { offset: count }),
        };
        chars[written] = unit;
        written += 1;
    }

    Ok(written)
}

/// Join decoded UTF-16 code units into a `String`, pairing surrogates.
///
/// # Errors
///
/// [`WireError::UnpairedSurrogate`] if a surrogate half has no partner.
pub(crate) fn units_to_string(units: &[u16]) -> Result<String, WireError> {
    let mut out = String::with_capacity(units.len());
    let mut index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                out.push(c);
                index += c.len_utf16();
            }
            Err(e) => {
                return Err(WireError::UnpairedSurrogate {
                    unit: e.unpaired_surrogate(),
                    index,
                });
            }
        }
    }
    Ok(out)
}

/// Decode a complete modified-UTF-8 payload (without its length prefix).
///
/// Convenience wrapper for callers that hold the payload bytes directly;
/// [`BufferReader::read_utf`](crate::BufferReader::read_utf) reuses a
/// scratch buffer instead of allocating one per call.
///
/// # Errors
///
/// See [`decode_from`] and [`units_to_string`].
pub fn decode(bytes: &[u8]) -> Result<String, WireError> {
    let mut chars = vec![0u16; bytes.len()];
    let count = ascii_prefix(bytes, &mut chars);
    let written = if count == bytes.len() {
        count
    } else {
        decode_from(bytes, count, &mut chars)?
    };
    units_to_string(&chars[..written])
}

/// Number of bytes `s` occupies in modified UTF-8, excluding the prefix.
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}

/// Append `s` to `buf` as `[u16 BE length][modified UTF-8]`.
///
/// # Returns
///
/// The number of bytes written, prefix included.
///
/// # Errors
///
/// [`WireError::StringTooLong`] if the payload exceeds
/// [`MAX_ENCODED_LEN`]; nothing is written in that case.
pub fn encode_into(s: &str, buf: &mut Vec<u8>) -> Result<usize, WireError> {
    let len = encoded_len(s);
    let prefix = u16::try_from(len).map_err(|_| WireError::StringTooLong { len })?;

    buf.reserve(2 + len);
    buf.extend_from_slice(&prefix.to_be_bytes());
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => buf.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                buf.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                buf.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                buf.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                buf.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                buf.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }

    Ok(2 + len)
}

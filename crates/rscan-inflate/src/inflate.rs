use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use rscan_wire::BufferReader;
use tracing::debug;

use crate::compression::Compression;
use crate::error::{InflateError, ParseDecompressorError};
use crate::internal::InternalInflater;
use crate::scratch::{ScratchBuffer, with_scratch};
use crate::standard::StandardInflater;

/// Capability shared by every decompressor variant.
///
/// `input` is always the whole compressed payload and is never modified.
/// When a `scratch` buffer is supplied an implementation may grow it and
/// decode into it, in which case the returned `Cow` borrows the valid
/// prefix. Otherwise (or when the variant prefers a fresh allocation) the
/// output is returned owned.
pub trait Inflate {
    /// Decode a zlib-wrapped deflate stream (RFC 1950).
    ///
    /// # Errors
    ///
    /// Any [`InflateError`] for which [`is_bad_data`] holds.
    ///
    /// [`is_bad_data`]: InflateError::is_bad_data
    fn decode_zlib<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError>;

    /// Decode one or more concatenated gzip members (RFC 1952).
    ///
    /// # Errors
    ///
    /// Any [`InflateError`] for which [`is_bad_data`] holds.
    ///
    /// [`is_bad_data`]: InflateError::is_bad_data
    fn decode_gzip<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError>;

    /// Short lowercase name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Decode `input` according to `compression`. Uncompressed input is
    /// copied into the scratch buffer (or a fresh one).
    ///
    /// # Errors
    ///
    /// Whatever the selected decode path reports.
    fn decode<'s>(
        &self,
        compression: Compression,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        match compression {
            Compression::Gzip => self.decode_gzip(input, scratch),
            Compression::Zlib => self.decode_zlib(input, scratch),
            Compression::Uncompressed => with_scratch(scratch, |out| {
                out.ensure_len(input.len());
                out.as_mut_slice()[..input.len()].copy_from_slice(input);
                Ok(input.len())
            }),
        }
    }

    /// Read one length-prefixed frame from `reader` and decode it.
    ///
    /// Frame layout:
    ///
    /// ```text
    ///   ┌──────────────────┬────────────┬──────────────────────────┐
    ///   │ length (i32, BE) │ id (u8)    │ payload (length - 1)     │
    ///   └──────────────────┴────────────┴──────────────────────────┘
    /// ```
    ///
    /// `length` counts the id byte. Once the whole frame is in the buffer
    /// the reader moves past it, whether or not the payload then decodes,
    /// so a scanner can skip a bad frame and carry on.
    ///
    /// # Errors
    ///
    /// - [`InflateError::Wire`] if the header or payload runs past the
    ///   end of the reader.
    /// - [`InflateError::EmptyFrame`] if `length < 1`.
    /// - [`InflateError::UnsupportedCompression`] for an unknown id.
    /// - Any decode error of the selected path.
    fn decode_framed<'s>(
        &self,
        reader: &mut BufferReader<'_>,
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        let start = reader.position();
        let length = reader.read_int()?;
        let payload_len = length
            .checked_sub(1)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(InflateError::EmptyFrame { length })?;
        let id = reader.read_unsigned_byte()?;
        let payload = reader.read_slice(payload_len)?;
        let compression = Compression::from_id(id)?;
        debug!(
            offset = start,
            length,
            ?compression,
            decompressor = self.name(),
            "decoding frame"
        );
        self.decode(compression, payload, scratch)
    }
}

/// Runtime selection between the two decompressor implementations.
///
/// ```
/// use rscan_inflate::{Decompressor, Inflate};
///
/// let d: Decompressor = "Standard".parse().unwrap();
/// assert_eq!(d, Decompressor::Standard);
/// assert_eq!(d.to_string(), "standard");
/// assert_eq!(Decompressor::default().name(), "internal");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Decompressor {
    /// [`InternalInflater`].
    #[default]
    Internal,
    /// [`StandardInflater`].
    Standard,
}

impl Decompressor {
    /// Every variant, for differential testing.
    pub const ALL: [Self; 2] = [Self::Internal, Self::Standard];

    fn inflater(self) -> &'static dyn Inflate {
        match self {
            Self::Internal => &InternalInflater,
            Self::Standard => &StandardInflater,
        }
    }
}

impl Inflate for Decompressor {
    fn decode_zlib<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        self.inflater().decode_zlib(input, scratch)
    }

    fn decode_gzip<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        self.inflater().decode_gzip(input, scratch)
    }

    fn name(&self) -> &'static str {
        self.inflater().name()
    }
}

impl fmt::Display for Decompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Decompressor {
    type Err = ParseDecompressorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDecompressorError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_ZLIB: [u8; 13] = [
        0x78, 0x9C, 0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00, 0x06, 0x2C, 0x02, 0x15,
    ];

    fn frame(id: u8, payload: &[u8]) -> Vec<u8> {
        let length = i32::try_from(payload.len() + 1).unwrap();
        let mut out = length.to_be_bytes().to_vec();
        out.push(id);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn parse_names() {
        assert_eq!("internal".parse::<Decompressor>(), Ok(Decompressor::Internal));
        assert_eq!(" STANDARD ".parse::<Decompressor>(), Ok(Decompressor::Standard));
        let err = "zstd".parse::<Decompressor>().unwrap_err();
        assert_eq!(err.name, "zstd");
    }

    #[test]
    fn display_round_trips() {
        for d in Decompressor::ALL {
            assert_eq!(d.to_string().parse::<Decompressor>(), Ok(d));
        }
    }

    #[test]
    fn default_is_internal() {
        assert_eq!(Decompressor::default(), Decompressor::Internal);
    }

    #[test]
    fn decode_uncompressed_copies_into_scratch() {
        let mut scratch = ScratchBuffer::with_len(2);
        for d in Decompressor::ALL {
            let out = d
                .decode(Compression::Uncompressed, b"raw bytes", Some(&mut scratch))
                .unwrap();
            assert_eq!(&*out, b"raw bytes");
        }
        assert!(scratch.len() >= 9);
    }

    #[test]
    fn decode_dispatches_zlib() {
        for d in Decompressor::ALL {
            let out = d.decode(Compression::Zlib, &HELLO_ZLIB, None).unwrap();
            assert_eq!(&*out, b"hello", "{d}");
        }
    }

    #[test]
    fn framed_zlib_advances_past_payload() {
        let mut bytes = frame(2, &HELLO_ZLIB);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        for d in Decompressor::ALL {
            let mut reader = BufferReader::new(&bytes);
            let out = d.decode_framed(&mut reader, None).unwrap();
            assert_eq!(&*out, b"hello");
            assert_eq!(reader.position(), 4 + 1 + HELLO_ZLIB.len());
            assert_eq!(reader.read_unsigned_short().unwrap(), 0xAABB);
        }
    }

    #[test]
    fn framed_rejects_empty_length() {
        let bytes = 0i32.to_be_bytes();
        let mut reader = BufferReader::new(&bytes);
        let result = Decompressor::Internal.decode_framed(&mut reader, None);
        assert!(matches!(result, Err(InflateError::EmptyFrame { length: 0 })));
    }

    #[test]
    fn framed_rejects_unknown_id() {
        let bytes = frame(9, b"x");
        let mut reader = BufferReader::new(&bytes);
        let result = Decompressor::Standard.decode_framed(&mut reader, None);
        assert!(matches!(
            result,
            Err(InflateError::UnsupportedCompression { id: 9 })
        ));
    }

    #[test]
    fn framed_unknown_id_still_skips_the_frame() {
        let mut bytes = frame(9, b"opaque payload");
        bytes.extend_from_slice(&frame(3, b"next"));
        let mut reader = BufferReader::new(&bytes);

        let err = Decompressor::Internal
            .decode_framed(&mut reader, None)
            .unwrap_err();
        assert!(matches!(err, InflateError::UnsupportedCompression { id: 9 }));
        assert_eq!(reader.position(), 4 + 1 + 14);

        let out = Decompressor::Internal.decode_framed(&mut reader, None).unwrap();
        assert_eq!(&*out, b"next");
    }

    #[test]
    fn framed_rejects_negative_lengths() {
        for length in [-1, i32::MIN] {
            let bytes = length.to_be_bytes();
            let mut reader = BufferReader::new(&bytes);
            let result = Decompressor::Standard.decode_framed(&mut reader, None);
            assert!(matches!(
                result,
                Err(InflateError::EmptyFrame { length: got }) if got == length
            ));
        }
    }

    #[test]
    fn framed_short_payload_is_wire_error() {
        let mut bytes = frame(3, b"abcdef");
        bytes.truncate(bytes.len() - 2);
        let mut reader = BufferReader::new(&bytes);
        let err = Decompressor::Internal
            .decode_framed(&mut reader, None)
            .unwrap_err();
        match err {
            InflateError::Wire(w) => assert!(w.is_end_of_data()),
            other => panic!("expected wire error, got {other:?}"),
        }
    }
}

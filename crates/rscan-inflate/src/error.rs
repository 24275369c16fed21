use rscan_wire::WireError;

/// Errors that can occur while inflating a compressed payload.
///
/// Both decompressor variants report through this type. Apart from
/// `UnsupportedCompression`, `EmptyFrame` and `Wire`, every variant means
/// the compressed bytes themselves are bad; [`is_bad_data`] groups those
/// so a scanner can skip the record and move on.
///
/// ```text
///   InflateError
///   ├── Truncated               ← stream ended before the final block
///   ├── NeedsDictionary         ← zlib FDICT stream, no dictionary support
///   ├── Corrupt                 ← deflate engine rejected the data
///   ├── InvalidGzipHeader       ← magic, method, flags or header CRC wrong
///   ├── ChecksumMismatch        ← gzip CRC-32 trailer disagrees
///   ├── SizeMismatch            ← gzip ISIZE trailer disagrees
///   ├── Io(std::io::Error)      ← from the gzip read stream
///   ├── UnsupportedCompression  ← unknown compression id in a frame
///   ├── EmptyFrame              ← frame length can't hold the id byte
///   └── Wire(WireError)         ← frame header couldn't be read
/// ```
///
/// [`is_bad_data`]: InflateError::is_bad_data
#[derive(Debug, thiserror::Error)]
pub enum InflateError {
    /// The inflater consumed all input without reaching the end of the
    /// stream. The whole payload must be present up front; there is no
    /// way to supply more.
    #[error("compressed stream is truncated: inflater needs more input")]
    Truncated,

    /// A zlib stream declared a preset dictionary.
    #[error("compressed stream requires a preset dictionary")]
    NeedsDictionary,

    /// The deflate engine reported an error (bad block type, invalid
    /// distance, Adler-32 mismatch, ...).
    #[error("corrupt deflate stream: {0}")]
    Corrupt(String),

    /// A gzip member header failed validation. `offset` is absolute
    /// within the input.
    #[error("invalid gzip header at offset {offset}: {reason}")]
    InvalidGzipHeader { offset: usize, reason: &'static str },

    #[error("gzip crc32 mismatch: trailer says {expected:#010X}, computed {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// `actual` is the inflated member size modulo 2^32, as stored.
    #[error("gzip size mismatch: trailer says {expected} bytes, inflated {actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    /// Error surfaced by the gzip read stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unsupported compression id {id}")]
    UnsupportedCompression { id: u8 },

    /// A length-prefixed frame declared fewer than the one byte needed
    /// for its compression id.
    #[error("compressed frame length {length} is too small")]
    EmptyFrame { length: i32 },

    /// A frame header could not be read from the surrounding buffer.
    #[error(transparent)]
    Wire(#[from] WireError),
}

impl InflateError {
    /// `true` when the compressed bytes are corrupt, truncated or need
    /// features this layer doesn't have.
    pub fn is_bad_data(&self) -> bool {
        matches!(
            self,
            Self::Truncated
                | Self::NeedsDictionary
                | Self::Corrupt(_)
                | Self::InvalidGzipHeader { .. }
                | Self::ChecksumMismatch { .. }
                | Self::SizeMismatch { .. }
                | Self::Io(_)
        )
    }
}

/// Returned when a decompressor name doesn't match a known variant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown decompressor {name:?}, expected \"internal\" or \"standard\"")]
pub struct ParseDecompressorError {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_data_classification() {
        assert!(InflateError::Truncated.is_bad_data());
        assert!(InflateError::Corrupt("invalid distance".into()).is_bad_data());
        assert!(
            InflateError::ChecksumMismatch {
                expected: 1,
                actual: 2
            }
            .is_bad_data()
        );
        assert!(!InflateError::UnsupportedCompression { id: 9 }.is_bad_data());
        assert!(!InflateError::EmptyFrame { length: 0 }.is_bad_data());
    }

    #[test]
    fn display_messages() {
        insta::assert_snapshot!(
            InflateError::ChecksumMismatch { expected: 0xDEAD_BEEF, actual: 0x1234 }.to_string(),
            @"gzip crc32 mismatch: trailer says 0xDEADBEEF, computed 0x00001234"
        );
        insta::assert_snapshot!(
            InflateError::InvalidGzipHeader { offset: 0, reason: "bad magic" }.to_string(),
            @"invalid gzip header at offset 0: bad magic"
        );
        insta::assert_snapshot!(
            ParseDecompressorError { name: "zstd".into() }.to_string(),
            @r#"unknown decompressor "zstd", expected "internal" or "standard""#
        );
    }
}

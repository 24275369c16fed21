/// Errors raised while decoding values out of an in-memory buffer.
///
/// Every variant carries the context needed to locate the fault in the
/// byte stream. Offsets inside a modified-UTF-8 string are relative to
/// the first byte after its 2-byte length prefix.
///
/// ```text
///   WireError
///   ├── EndOfData          ← fewer bytes remain than the read needs
///   ├── OutOfRange         ← destination slice can't hold the request
///   ├── MalformedInput     ← bad lead byte or continuation byte
///   ├── PartialCharacter   ← multi-byte sequence cut off by the length
///   ├── UnpairedSurrogate  ← decoded UTF-16 can't form a Rust string
///   ├── StringTooLong      ← encoded string doesn't fit a u16 prefix
///   └── NotImplemented     ← operation exists only for API parity
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The buffer ran out before a fixed- or variable-length read.
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    EndOfData {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// `offset + len` does not fit inside the destination slice.
    #[error("destination range {offset}+{len} exceeds capacity {capacity}")]
    OutOfRange {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A lead byte with no valid sequence, or a continuation byte
    /// whose top two bits are not `10`.
    #[error("malformed input around byte {offset}")]
    MalformedInput { offset: usize },

    /// A 2- or 3-byte sequence starting at `offset` would run past the
    /// declared string length.
    #[error("malformed input: partial character at end")]
    PartialCharacter { offset: usize },

    /// The decoded code units hold a lone surrogate. `index` counts
    /// UTF-16 code units, not bytes.
    #[error("malformed input: unpaired surrogate {unit:#06X} at character {index}")]
    UnpairedSurrogate { unit: u16, index: usize },

    /// The modified-UTF-8 form of a string exceeds 65535 bytes.
    #[error("encoded string too long: {len} bytes")]
    StringTooLong { len: usize },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },
}

/// Coarse error classes callers branch on when choosing a recovery
/// strategy (skip the record, abort the scan, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EndOfData,
    MalformedEncoding,
    InvalidArgument,
    NotImplemented,
}

impl WireError {
    /// Collapse the variant onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EndOfData { .. } => ErrorKind::EndOfData,
            Self::MalformedInput { .. }
            | Self::PartialCharacter { .. }
            | Self::UnpairedSurrogate { .. }
            | Self::StringTooLong { .. } => ErrorKind::MalformedEncoding,
            Self::OutOfRange { .. } => ErrorKind::InvalidArgument,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }

    pub fn is_end_of_data(&self) -> bool {
        self.kind() == ErrorKind::EndOfData
    }

    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedEncoding
    }
}

use crate::error::InflateError;

/// Compression scheme of a framed payload, identified by a one-byte id.
///
/// ```text
///   id  scheme
///   1   gzip (one or more members)
///   2   zlib
///   3   stored as-is
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Compression {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

impl Compression {
    /// Map a wire id to its scheme.
    ///
    /// # Errors
    ///
    /// Returns [`InflateError::UnsupportedCompression`] for any id other
    /// than 1, 2 or 3.
    pub fn from_id(id: u8) -> Result<Self, InflateError> {
        match id {
            1 => Ok(Self::Gzip),
            2 => Ok(Self::Zlib),
            3 => Ok(Self::Uncompressed),
            _ => Err(InflateError::UnsupportedCompression { id }),
        }
    }

    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Compression {
    type Error = InflateError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

/// zlib `FLG` bit announcing a preset dictionary id after the header.
const ZLIB_FDICT: u8 = 0b0010_0000;

/// `true` when `input` opens with a well-formed zlib header (deflate
/// method, valid FCHECK) that has FDICT set.
pub(crate) fn zlib_requests_dictionary(input: &[u8]) -> bool {
    match input {
        [cmf, flg, ..] => {
            cmf & 0x0F == 8
                && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
                && flg & ZLIB_FDICT != 0
        }
        _ => false,
    }
}

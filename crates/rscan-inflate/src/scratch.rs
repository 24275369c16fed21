use std::borrow::Cow;

use tracing::trace;

use crate::error::InflateError;

/// Smallest length a doubling step will produce, so an empty buffer
/// still makes progress.
const MIN_GROWTH_LEN: usize = 64;

/// Growth-only byte buffer reused as inflate output across calls.
///
/// A scanner that inflates thousands of chunks keeps one `ScratchBuffer`
/// and passes it to every decode call. The buffer only ever grows, so
/// after the largest payload has been seen no further allocation happens.
///
/// The bytes past the valid length of the last decode are leftovers from
/// earlier calls; only the slice handed back by the decode call is
/// meaningful. A `ScratchBuffer` is not meant to be shared between
/// concurrent decoders; each needs its own.
#[derive(Clone, Debug, Default)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Create an empty buffer. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-filled buffer of `len` bytes.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Grow to at least `len` bytes. Never shrinks.
    pub fn ensure_len(&mut self, len: usize) {
        if self.bytes.len() < len {
            trace!(from = self.bytes.len(), to = len, "growing scratch buffer");
            self.bytes.resize(len, 0);
        }
    }

    /// Double the buffer length (at least [`MIN_GROWTH_LEN`]).
    pub fn grow(&mut self) {
        let next = self.bytes.len().saturating_mul(2).max(MIN_GROWTH_LEN);
        self.ensure_len(next);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// The first `len` bytes, i.e. the output of a decode call that
    /// reported `len` valid bytes.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the buffer length.
    #[must_use]
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.bytes[..len]
    }

    /// Give up the buffer, keeping only the first `len` bytes.
    #[must_use]
    pub fn into_vec(mut self, len: usize) -> Vec<u8> {
        self.bytes.truncate(len);
        self.bytes
    }
}

impl From<Vec<u8>> for ScratchBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Run `fill` against the caller's scratch buffer, or a fresh one.
///
/// `fill` returns the number of valid output bytes. With a caller buffer
/// the result borrows from it; otherwise the fresh buffer is truncated
/// and returned owned.
pub(crate) fn with_scratch<'s, F>(
    scratch: Option<&'s mut ScratchBuffer>,
    fill: F,
) -> Result<Cow<'s, [u8]>, InflateError>
where
    F: FnOnce(&mut ScratchBuffer) -> Result<usize, InflateError>,
{
    match scratch {
        Some(buf) => {
            let len = fill(&mut *buf)?;
            let buf: &'s ScratchBuffer = buf;
            Ok(Cow::Borrowed(buf.filled(len)))
        }
        None => {
            let mut buf = ScratchBuffer::new();
            let len = fill(&mut buf)?;
            Ok(Cow::Owned(buf.into_vec(len)))
        }
    }
}

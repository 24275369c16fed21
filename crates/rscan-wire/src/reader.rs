use tracing::trace;

use crate::error::WireError;
use crate::mutf8;

/// Initial size of the scratch character buffer, in UTF-16 code units.
const INITIAL_SCRATCH_CHARS: usize = 128;

/// Cursor-based big-endian reader over a caller-owned byte buffer.
///
/// `BufferReader` borrows a fully buffered payload and decodes values
/// from it front to back, the way a classic data-input stream would:
///
/// ```text
///   0            position                     limit
///   ├──────────────┼────────────────────────────┤
///   │  consumed    │         remaining          │
///   └──────────────┴────────────────────────────┘
/// ```
///
/// Every read checks `remaining()` before touching the cursor, so a failed
/// read leaves the position exactly where it was. The one exception is
/// [`skip_bytes`](Self::skip_bytes), which moves the cursor without any
/// check and may leave it past the limit.
///
/// The reader owns a scratch buffer of UTF-16 code units that
/// [`read_utf`](Self::read_utf) decodes into. It grows to fit the largest
/// string seen so far and is never shrunk, so a reader reused across many
/// records stops allocating once it has warmed up. All reads take
/// `&mut self`; a reader is meant to be owned by one decoding loop.
///
/// # Example
///
/// ```rust
/// use rscan_wire::BufferReader;
///
/// let bytes = [0x00, 0x2A, 0x00, 0x02, b'o', b'k'];
/// let mut reader = BufferReader::new(&bytes);
/// assert_eq!(reader.read_short().unwrap(), 42);
/// assert_eq!(reader.read_utf().unwrap(), "ok");
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
    pos: usize,
    chars: Vec<u16>,
}

impl<'a> BufferReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            chars: vec![0; INITIAL_SCRATCH_CHARS],
        }
    }

    /// Current cursor position. May exceed [`limit`](Self::limit) after
    /// an unchecked skip.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the underlying buffer.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.buf.len()
    }

    /// Bytes left between the cursor and the limit; zero once the cursor
    /// has been skipped past the limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Current size of the scratch character buffer, in code units.
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.chars.len()
    }

    fn ensure(&self, needed: usize) -> Result<(), WireError> {
        let remaining = self.remaining();
        // A cursor skipped past the limit has nothing left, not even an
        // empty slice to hand out.
        if remaining < needed || self.pos > self.buf.len() {
            return Err(WireError::EndOfData {
                offset: self.pos,
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    // ── Bulk reads ────────────────────────────────────────────────────────

    /// Borrow the next `len` bytes without copying and advance past them.
    ///
    /// The returned slice lives as long as the underlying buffer, not the
    /// reader, so it can be handed to a decompressor while the reader
    /// keeps going.
    ///
    /// # Errors
    ///
    /// [`WireError::EndOfData`] if fewer than `len` bytes remain. The
    /// cursor is not moved.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        self.ensure(len)?;
        let buf = self.buf;
        let slice = &buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Fill `dest` completely from the buffer.
    ///
    /// # Errors
    ///
    /// [`WireError::EndOfData`] if fewer than `dest.len()` bytes remain.
    /// Nothing is copied and the cursor is not moved.
    pub fn read_fully(&mut self, dest: &mut [u8]) -> Result<(), WireError> {
        let src = self.read_slice(dest.len())?;
        dest.copy_from_slice(src);
        Ok(())
    }

    /// Copy `len` bytes into `dest[offset..offset + len]`.
    ///
    /// # Errors
    ///
    /// - [`WireError::EndOfData`] if fewer than `len` bytes remain.
    /// - [`WireError::OutOfRange`] if the range does not fit in `dest`.
    ///
    /// In both cases the cursor is not moved.
    pub fn read_fully_at(
        &mut self,
        dest: &mut [u8],
        offset: usize,
        len: usize,
    ) -> Result<(), WireError> {
        self.ensure(len)?;
        let capacity = dest.len();
        let target = offset
            .checked_add(len)
            .and_then(|end| dest.get_mut(offset..end))
            .ok_or(WireError::OutOfRange {
                offset,
                len,
                capacity,
            })?;
        target.copy_from_slice(&self.buf[self.pos..self.pos + len]);
        self.pos += len;
        Ok(())
    }

    /// Advance the cursor by `n` bytes and return `n`.
    ///
    /// There is no bounds check: skipping past the limit succeeds and the
    /// next read fails with [`WireError::EndOfData`].
    pub fn skip_bytes(&mut self, n: usize) -> usize {
        self.pos = self.pos.saturating_add(n);
        n
    }

    // ── Fixed-width reads ─────────────────────────────────────────────────
    //
    // All big-endian. Each one consumes exactly its natural width or
    // fails with EndOfData without moving the cursor.

    /// Read one byte; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.take::<1>()?[0] != 0)
    }

    pub fn read_byte(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_be_bytes(self.take()?))
    }

    pub fn read_unsigned_byte(&mut self) -> Result<u8, WireError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_short(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    pub fn read_unsigned_short(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    /// Read one UTF-16 code unit. Surrogate halves come back as-is.
    pub fn read_char(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn read_int(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    pub fn read_long(&mut self) -> Result<i64, WireError> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    pub fn read_float(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_be_bytes(self.take()?))
    }

    pub fn read_double(&mut self) -> Result<f64, WireError> {
        Ok(f64::from_be_bytes(self.take()?))
    }

    // ── Text ──────────────────────────────────────────────────────────────

    /// Read a length-prefixed modified-UTF-8 string.
    ///
    /// Decoding proceeds in two phases:
    ///
    ///   1. **ASCII fast path**: copy bytes straight into the scratch
    ///      buffer until one is above `0x7F`. A pure-ASCII string returns
    ///      here.
    ///   2. **Sequence decoder**: resume at the first non-ASCII byte and
    ///      decode 1/2/3-byte sequences keyed on the lead byte's top
    ///      nibble (see [`mutf8`]).
    ///
    /// On success the cursor sits exactly `2 + L` bytes further on. If the
    /// payload is malformed, the length prefix stays consumed and the
    /// payload does not.
    ///
    /// # Errors
    ///
    /// - [`WireError::EndOfData`] if the prefix or the `L` payload bytes
    ///   are not available.
    /// - [`WireError::MalformedInput`], [`WireError::PartialCharacter`] or
    ///   [`WireError::UnpairedSurrogate`] for an invalid payload; offsets
    ///   are relative to the first payload byte.
    pub fn read_utf(&mut self) -> Result<String, WireError> {
        let utf_len = usize::from(self.read_unsigned_short()?);
        self.ensure(utf_len)?;

        let buf = self.buf;
        let bytes = &buf[self.pos..self.pos + utf_len];
        if self.chars.len() < utf_len {
            trace!(from = self.chars.len(), to = utf_len, "growing scratch char buffer");
            self.chars.resize(utf_len, 0);
        }
        let chars = &mut self.chars[..utf_len];

        let count = mutf8::ascii_prefix(bytes, chars);
        let written = if count == utf_len {
            count
        } else {
            mutf8::decode_from(bytes, count, chars)?
        };

        let decoded = mutf8::units_to_string(&chars[..written])?;
        self.skip_bytes(utf_len);
        Ok(decoded)
    }

    /// Line-oriented reads have no meaning for binary payloads.
    ///
    /// # Errors
    ///
    /// Always [`WireError::NotImplemented`].
    pub fn read_line(&mut self) -> Result<String, WireError> {
        Err(WireError::NotImplemented {
            operation: "read_line",
        })
    }
}

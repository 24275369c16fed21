use crate::error::InflateError;

/// Gzip member magic: `1F 8B`.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression method byte for deflate, the only one gzip defines.
pub const METHOD_DEFLATE: u8 = 8;

/// Size of the fixed part of a member header.
pub const FIXED_HEADER_SIZE: usize = 10;

/// Size of the member trailer (CRC-32 + ISIZE).
pub const TRAILER_SIZE: usize = 8;

/// Gzip `FLG` bitfield.
///
/// Bit layout:
///   bit 0 = FTEXT    (hint only, ignored)
///   bit 1 = FHCRC    (CRC-16 of the header follows the optional fields)
///   bit 2 = FEXTRA   (u16 LE length + extra field)
///   bit 3 = FNAME    (zero-terminated original file name)
///   bit 4 = FCOMMENT (zero-terminated comment)
///   bits 5-7 = reserved (MUST be 0)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GzipFlags(u8);

impl GzipFlags {
    pub const NONE: Self = Self(0);
    pub const TEXT: Self = Self(0b0000_0001);
    pub const HEADER_CRC: Self = Self(0b0000_0010);
    pub const EXTRA: Self = Self(0b0000_0100);
    pub const NAME: Self = Self(0b0000_1000);
    pub const COMMENT: Self = Self(0b0001_0000);

    const RESERVED: u8 = 0b1110_0000;

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn has_header_crc(self) -> bool {
        self.0 & Self::HEADER_CRC.0 != 0
    }

    pub fn has_extra(self) -> bool {
        self.0 & Self::EXTRA.0 != 0
    }

    pub fn has_name(self) -> bool {
        self.0 & Self::NAME.0 != 0
    }

    pub fn has_comment(self) -> bool {
        self.0 & Self::COMMENT.0 != 0
    }

    fn has_reserved(self) -> bool {
        self.0 & Self::RESERVED != 0
    }
}

/// A parsed gzip member header (RFC 1952 §2.3).
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                              │
/// ├────────┼─────────┼──────────────────────────────────────────┤
/// │ 0x00   │ 2 bytes │ Magic: 1F 8B                             │
/// │ 0x02   │ 1 byte  │ Compression method (8 = deflate)         │
/// │ 0x03   │ 1 byte  │ Flags (FLG)                              │
/// │ 0x04   │ 4 bytes │ MTIME, little-endian                     │
/// │ 0x08   │ 1 byte  │ Extra flags (XFL)                        │
/// │ 0x09   │ 1 byte  │ OS                                       │
/// │ 0x0A   │ ...     │ FEXTRA, FNAME, FCOMMENT, FHCRC if flagged │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// The optional fields borrow from the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GzipHeader<'a> {
    pub flags: GzipFlags,
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
    pub extra: Option<&'a [u8]>,
    /// Original file name, without the terminating zero.
    pub filename: Option<&'a [u8]>,
    /// Comment, without the terminating zero.
    pub comment: Option<&'a [u8]>,
}

fn invalid(offset: usize, reason: &'static str) -> InflateError {
    InflateError::InvalidGzipHeader { offset, reason }
}

/// Split a zero-terminated field off `input[start..]`.
fn zero_terminated(input: &[u8], start: usize) -> Result<(&[u8], usize), InflateError> {
    let rest = &input[start..];
    let end = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| invalid(input.len(), "unterminated header field"))?;
    Ok((&rest[..end], start + end + 1))
}

impl<'a> GzipHeader<'a> {
    /// Parse the member header starting at `input[start..]`.
    ///
    /// # Returns
    ///
    /// `(header, end)` where `end` is the absolute offset of the first
    /// byte of deflate data.
    ///
    /// # Errors
    ///
    /// [`InflateError::InvalidGzipHeader`] with an absolute offset if the
    /// header is truncated, the magic or method is wrong, a reserved flag
    /// bit is set, or the optional header CRC does not match.
    pub fn parse(input: &'a [u8], start: usize) -> Result<(Self, usize), InflateError> {
        let buf = input.get(start..).unwrap_or_default();
        if buf.len() < FIXED_HEADER_SIZE {
            return Err(invalid(input.len(), "truncated header"));
        }

        // Validate magic, then method, then flags: the first failure is
        // the most useful one to report.
        if buf[0..2] != GZIP_MAGIC {
            return Err(invalid(start, "bad magic"));
        }
        if buf[2] != METHOD_DEFLATE {
            return Err(invalid(start + 2, "unsupported compression method"));
        }
        let flags = GzipFlags::from_raw(buf[3]);
        if flags.has_reserved() {
            return Err(invalid(start + 3, "reserved flag bits set"));
        }

        let mtime = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let extra_flags = buf[8];
        let os = buf[9];
        let mut cursor = start + FIXED_HEADER_SIZE;

        let mut extra = None;
        if flags.has_extra() {
            let len_bytes = input
                .get(cursor..cursor + 2)
                .ok_or_else(|| invalid(input.len(), "truncated extra field"))?;
            let xlen = usize::from(u16::from_le_bytes([len_bytes[0], len_bytes[1]]));
            cursor += 2;
            extra = Some(
                input
                    .get(cursor..cursor + xlen)
                    .ok_or_else(|| invalid(input.len(), "truncated extra field"))?,
            );
            cursor += xlen;
        }

        let mut filename = None;
        if flags.has_name() {
            let (field, next) = zero_terminated(input, cursor)?;
            filename = Some(field);
            cursor = next;
        }

        let mut comment = None;
        if flags.has_comment() {
            let (field, next) = zero_terminated(input, cursor)?;
            comment = Some(field);
            cursor = next;
        }

        if flags.has_header_crc() {
            let stored = input
                .get(cursor..cursor + 2)
                .ok_or_else(|| invalid(input.len(), "truncated header crc"))?;
            let stored = u16::from_le_bytes([stored[0], stored[1]]);
            // FHCRC is the low 16 bits of the CRC-32 over the header so far
            let computed = (crc32fast::hash(&input[start..cursor]) & 0xFFFF) as u16;
            if stored != computed {
                return Err(invalid(cursor, "header crc mismatch"));
            }
            cursor += 2;
        }

        Ok((
            Self {
                flags,
                mtime,
                extra_flags,
                os,
                extra,
                filename,
                comment,
            },
            cursor,
        ))
    }
}

/// The 8-byte trailer closing every gzip member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GzipTrailer {
    /// CRC-32 of the uncompressed member data.
    pub crc32: u32,
    /// Uncompressed member size modulo 2^32.
    pub size: u32,
}

impl GzipTrailer {
    /// Read the trailer at `input[start..]`.
    ///
    /// # Errors
    ///
    /// [`InflateError::Truncated`] if fewer than [`TRAILER_SIZE`] bytes
    /// remain.
    pub fn parse(input: &[u8], start: usize) -> Result<Self, InflateError> {
        let buf = input
            .get(start..start + TRAILER_SIZE)
            .ok_or(InflateError::Truncated)?;
        Ok(Self {
            crc32: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Check `data`, the inflated member, against this trailer.
    ///
    /// # Errors
    ///
    /// [`InflateError::ChecksumMismatch`] or [`InflateError::SizeMismatch`].
    pub fn verify(&self, data: &[u8]) -> Result<(), InflateError> {
        let actual = crc32fast::hash(data);
        if actual != self.crc32 {
            return Err(InflateError::ChecksumMismatch {
                expected: self.crc32,
                actual,
            });
        }
        // ISIZE wraps at 4 GiB
        let actual = data.len() as u32;
        if actual != self.size {
            return Err(InflateError::SizeMismatch {
                expected: self.size,
                actual,
            });
        }
        Ok(())
    }
}

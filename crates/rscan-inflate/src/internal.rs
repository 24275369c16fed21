use std::borrow::Cow;

use miniz_oxide::inflate::TINFLStatus;
use miniz_oxide::inflate::core::{DecompressorOxide, decompress, inflate_flags};
use tracing::debug;

use crate::compression::zlib_requests_dictionary;
use crate::error::InflateError;
use crate::gzip::{GzipHeader, GzipTrailer, TRAILER_SIZE};
use crate::inflate::Inflate;
use crate::scratch::{ScratchBuffer, with_scratch};

/// Deflate can't expand input by more than about 1032:1, which bounds
/// how far a corrupt ISIZE hint can inflate the first allocation.
const MAX_DEFLATE_RATIO: usize = 1032;

/// Self-contained inflater driving the deflate core directly.
///
/// Unlike [`StandardInflater`](crate::StandardInflater) it parses gzip
/// member headers and trailers itself and writes every format straight
/// into the caller's scratch buffer, doubling it whenever the core
/// reports it has more output.
///
/// ```text
///   gzip member:  [header] ──▶ raw inflate ──▶ [crc32 | isize] ──▶ next member?
///   zlib stream:  inflate with zlib header + adler-32 check
/// ```
///
/// Output is byte-for-byte identical to `StandardInflater` on valid
/// input; on invalid input both fail, though not always with the same
/// [`InflateError`] variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InternalInflater;

/// Inflate one deflate stream from `input` into `out[start..]`.
///
/// # Returns
///
/// `(consumed, end)`: input bytes used (the core hands back any
/// look-ahead past the final block) and the absolute end offset of the
/// output.
fn inflate_into(
    input: &[u8],
    out: &mut ScratchBuffer,
    start: usize,
    zlib: bool,
) -> Result<(usize, usize), InflateError> {
    let mut state = Box::<DecompressorOxide>::default();
    let mut flags = inflate_flags::TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF;
    if zlib {
        flags |= inflate_flags::TINFL_FLAG_PARSE_ZLIB_HEADER;
    }

    let mut in_pos = 0;
    let mut out_pos = 0;
    loop {
        if start + out_pos == out.len() {
            out.grow();
        }
        let (status, read, written) = decompress(
            &mut state,
            &input[in_pos..],
            &mut out.as_mut_slice()[start..],
            out_pos,
            flags,
        );
        in_pos += read;
        out_pos += written;

        match status {
            TINFLStatus::Done => return Ok((in_pos, start + out_pos)),
            TINFLStatus::HasMoreOutput => out.grow(),
            TINFLStatus::NeedsMoreInput | TINFLStatus::FailedCannotMakeProgress => {
                return Err(InflateError::Truncated);
            }
            other => return Err(InflateError::Corrupt(format!("{other:?}"))),
        }
    }
}

impl InternalInflater {
    fn inflate_zlib(input: &[u8], out: &mut ScratchBuffer) -> Result<usize, InflateError> {
        if zlib_requests_dictionary(input) {
            return Err(InflateError::NeedsDictionary);
        }
        out.ensure_len(input.len());
        let (_, end) = inflate_into(input, out, 0, true)?;
        Ok(end)
    }

    fn inflate_gzip(input: &[u8], out: &mut ScratchBuffer) -> Result<usize, InflateError> {
        // The last member's ISIZE is a decent first guess for the output
        // size of a single-member payload; doubling covers the rest.
        if let Some(hint) = input
            .len()
            .checked_sub(TRAILER_SIZE)
            .and_then(|at| GzipTrailer::parse(input, at).ok())
        {
            out.ensure_len((hint.size as usize).min(input.len().saturating_mul(MAX_DEFLATE_RATIO)));
        }

        let mut in_pos = 0;
        let mut out_len = 0;
        loop {
            let (_, data_start) = GzipHeader::parse(input, in_pos)?;
            let (consumed, end) = inflate_into(&input[data_start..], out, out_len, false)?;
            in_pos = data_start + consumed;

            let trailer = GzipTrailer::parse(input, in_pos)?;
            trailer.verify(&out.as_slice()[out_len..end])?;
            in_pos += TRAILER_SIZE;
            out_len = end;

            if in_pos >= input.len() {
                return Ok(out_len);
            }
            debug!(offset = in_pos, "gzip member boundary");
        }
    }
}

impl Inflate for InternalInflater {
    fn decode_zlib<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        with_scratch(scratch, |out| Self::inflate_zlib(input, out)).inspect_err(|e| {
            debug!(error = %e, len = input.len(), "internal zlib inflate failed");
        })
    }

    fn decode_gzip<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        with_scratch(scratch, |out| Self::inflate_gzip(input, out)).inspect_err(|e| {
            debug!(error = %e, len = input.len(), "internal gzip inflate failed");
        })
    }

    fn name(&self) -> &'static str {
        "internal"
    }
}

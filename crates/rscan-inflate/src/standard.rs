use std::borrow::Cow;
use std::io::Read;

use flate2::read::MultiGzDecoder;
use flate2::{Decompress, DecompressError, FlushDecompress, Status};
use tracing::debug;

use crate::compression::zlib_requests_dictionary;
use crate::error::InflateError;
use crate::inflate::Inflate;
use crate::scratch::{ScratchBuffer, with_scratch};

/// Inflater built on `flate2`'s stream engine and gzip reader.
///
/// zlib decoding primes a [`Decompress`] with the whole payload and
/// inflates into the scratch buffer, doubling it each time it fills
/// before the stream ends:
///
/// ```text
///   ┌───────────────┐  inflate   ┌──────────────────────────────┐
///   │ input (whole) │ ─────────▶ │ out[produced..]              │
///   └───────────────┘            └──────────────────────────────┘
///          │                         full? ──▶ double, continue
///          └─ consumed but not finished ──▶ Truncated
/// ```
///
/// gzip decoding always reads into a freshly allocated buffer and never
/// touches the caller's scratch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardInflater;

fn engine_error(e: &DecompressError) -> InflateError {
    if e.needs_dictionary().is_some() {
        InflateError::NeedsDictionary
    } else {
        InflateError::Corrupt(e.to_string())
    }
}

impl StandardInflater {
    fn inflate_zlib(input: &[u8], out: &mut ScratchBuffer) -> Result<usize, InflateError> {
        // The default flate2 backend reports FDICT as a generic data error
        if zlib_requests_dictionary(input) {
            return Err(InflateError::NeedsDictionary);
        }
        // Output starts at least as large as the input
        out.ensure_len(input.len());
        let mut engine = Decompress::new(true);

        loop {
            let consumed = engine.total_in() as usize;
            let produced = engine.total_out() as usize;
            let status = engine
                .decompress(
                    &input[consumed..],
                    &mut out.as_mut_slice()[produced..],
                    FlushDecompress::None,
                )
                .map_err(|e| engine_error(&e))?;

            let now_consumed = engine.total_in() as usize;
            let now_produced = engine.total_out() as usize;
            if status == Status::StreamEnd {
                return Ok(now_produced);
            }

            if now_produced == out.len() {
                out.grow();
            } else if now_consumed == input.len() {
                // Everything was handed over and the stream still isn't
                // finished; there is nothing more to feed it.
                return Err(InflateError::Truncated);
            } else if now_consumed == consumed && now_produced == produced {
                return Err(InflateError::Corrupt("inflater made no progress".into()));
            }
        }
    }

    fn inflate_gzip(input: &[u8]) -> Result<Vec<u8>, InflateError> {
        let mut out = Vec::new();
        MultiGzDecoder::new(input).read_to_end(&mut out)?;
        Ok(out)
    }
}

impl Inflate for StandardInflater {
    fn decode_zlib<'s>(
        &self,
        input: &[u8],
        scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        with_scratch(scratch, |out| Self::inflate_zlib(input, out)).inspect_err(|e| {
            debug!(error = %e, len = input.len(), "standard zlib inflate failed");
        })
    }

    fn decode_gzip<'s>(
        &self,
        input: &[u8],
        _scratch: Option<&'s mut ScratchBuffer>,
    ) -> Result<Cow<'s, [u8]>, InflateError> {
        Self::inflate_gzip(input)
            .map(Cow::Owned)
            .inspect_err(|e| {
                debug!(error = %e, len = input.len(), "standard gzip inflate failed");
            })
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

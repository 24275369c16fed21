#![warn(clippy::pedantic)]

pub mod compression;
pub mod error;
pub mod gzip;
pub mod inflate;
pub mod internal;
pub mod scratch;
pub mod standard;

pub use compression::Compression;
pub use error::{InflateError, ParseDecompressorError};
pub use inflate::{Decompressor, Inflate};
pub use internal::InternalInflater;
pub use scratch::ScratchBuffer;
pub use standard::StandardInflater;

#![warn(clippy::pedantic)]

pub mod error;
pub mod mutf8;
pub mod reader;

pub use error::{ErrorKind, WireError};
pub use reader::BufferReader;
